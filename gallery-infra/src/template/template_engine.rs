use anyhow::{anyhow, Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera};
use tracing::info;

/// 内置模板（模板名, 内容）
const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    ("uploadForm.html", include_str!("../../templates/uploadForm.html")),
    ("photoGallery.html", include_str!("../../templates/photoGallery.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

/// 模板渲染器trait
pub trait TemplateRenderer: Send + Sync {
    /// 渲染模板
    fn render(&self, template_name: &str, context: &TemplateContext) -> Result<String>;
}

/// 模板上下文
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// 模型数据
    pub model: HashMap<String, serde_json::Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: HashMap<String, serde_json::Value>) -> Self {
        self.model = model;
        self
    }

    pub fn insert(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.model.insert(key.into(), value);
        self
    }

    /// 把一个序列化为JSON对象的视图模型展开成上下文
    pub fn from_serialize<T: Serialize>(model: &T) -> Result<Self> {
        match serde_json::to_value(model)? {
            serde_json::Value::Object(map) => Ok(Self::new().with_model(map.into_iter().collect())),
            other => Err(anyhow!("View model must serialize to an object, got {}", other)),
        }
    }
}

/// Tera模板引擎实现
pub struct TeraTemplateEngine {
    tera: Tera,
}

impl TeraTemplateEngine {
    /// 配置了模板目录时从磁盘加载，否则使用内置模板
    pub fn new(template_dir: Option<&Path>) -> Result<Self> {
        match template_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    /// 使用编译进二进制的模板
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES)
            .context("Failed to compile built-in templates")?;
        tera.autoescape_on(vec![".html", ".htm", ".xml"]);
        Ok(Self { tera })
    }

    /// 从模板目录加载所有 `**/*.html`
    pub fn from_dir(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern = pattern
            .to_str()
            .ok_or_else(|| anyhow!("Invalid template path: {}", template_dir.display()))?;

        let mut tera = Tera::new(pattern)
            .with_context(|| format!("Failed to load templates from {}", template_dir.display()))?;
        tera.autoescape_on(vec![".html", ".htm", ".xml"]);

        info!("Loaded templates from {}", template_dir.display());
        Ok(Self { tera })
    }
}

impl TemplateRenderer for TeraTemplateEngine {
    fn render(&self, template_name: &str, context: &TemplateContext) -> Result<String> {
        let mut tera_context = Context::new();
        for (key, value) in &context.model {
            tera_context.insert(key, value);
        }

        self.tera
            .render(template_name, &tera_context)
            .with_context(|| format!("Failed to render template {}", template_name))
    }
}
