use serde::{Deserialize, Serialize};

/// 画廊默认显示配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySettings {
    /// 默认图片宽度
    pub width: u32,
    /// 默认图片高度
    pub height: u32,
    /// 默认行数
    pub rows: u32,
    /// 默认样式表
    pub stylesheet: String,
    /// 黑色背景样式表
    pub dark_stylesheet: String,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            rows: 4,
            stylesheet: "white.css".to_string(),
            dark_stylesheet: "black.css".to_string(),
        }
    }
}

/// 画廊页面的显示变体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryView {
    /// 全部使用默认值
    Default,
    /// 黑色背景
    BlackBackground,
    /// 指定行数（已校验为纯数字）
    Rows(String),
    /// 指定宽高（各为三位数字）
    Size { width: String, height: String },
    /// 原始尺寸，宽高留空
    Original,
}

/// 画廊视图模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryModel {
    /// 每个文件的下载地址
    pub files: Vec<String>,
    pub width: String,
    pub height: String,
    pub row: String,
    pub stylesheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GalleryModel {
    /// 按默认配置和视图变体构建模型
    pub fn new(settings: &GallerySettings, view: GalleryView, files: Vec<String>) -> Self {
        let mut model = Self {
            files,
            width: settings.width.to_string(),
            height: settings.height.to_string(),
            row: settings.rows.to_string(),
            stylesheet: settings.stylesheet.clone(),
            message: None,
        };

        match view {
            GalleryView::Default => {}
            GalleryView::BlackBackground => model.stylesheet = settings.dark_stylesheet.clone(),
            GalleryView::Rows(rows) => model.row = rows,
            GalleryView::Size { width, height } => {
                model.width = width;
                model.height = height;
            }
            GalleryView::Original => {
                model.width.clear();
                model.height.clear();
            }
        }
        model
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }
}
