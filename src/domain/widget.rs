//! Widget Settings
//!
//! One strongly-typed settings struct per widget kind. Stored as JSON and
//! never inspected by reconciliation.

use serde::{Deserialize, Serialize};

/// How a board list renders its posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoardListStyle {
    #[default]
    List,
    Card,
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetSettings {
    /// Latest posts of a board
    BoardList {
        board_id: String,
        #[serde(default = "default_post_limit")]
        limit: u32,
        #[serde(default)]
        style: BoardListStyle,
        #[serde(default)]
        show_date: bool,
    },
    /// Rotating image banner
    Carousel {
        slides: Vec<Slide>,
        #[serde(default = "default_interval_ms")]
        interval_ms: u32,
        #[serde(default = "default_true")]
        autoplay: bool,
    },
    /// Grid of uploaded media
    MediaGrid {
        media_ids: Vec<String>,
        #[serde(default = "default_grid_columns")]
        columns: u8,
    },
    /// Organization chart
    OrgChart {
        department_id: Option<String>,
        #[serde(default)]
        show_photos: bool,
    },
    /// Address, map and contact block
    LocationPanel {
        address: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
        phone: Option<String>,
    },
    /// Free-form rich text
    Html { content: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub image_url: String,
    pub link_url: Option<String>,
    pub caption: Option<String>,
}

fn default_post_limit() -> u32 {
    5
}

fn default_interval_ms() -> u32 {
    5000
}

fn default_grid_columns() -> u8 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for WidgetSettings {
    fn default() -> Self {
        WidgetSettings::Html { content: String::new() }
    }
}

impl WidgetSettings {
    /// Widget kind as stored in the `widget_type` column
    pub fn kind(&self) -> &'static str {
        match self {
            WidgetSettings::BoardList { .. } => "board_list",
            WidgetSettings::Carousel { .. } => "carousel",
            WidgetSettings::MediaGrid { .. } => "media_grid",
            WidgetSettings::OrgChart { .. } => "org_chart",
            WidgetSettings::LocationPanel { .. } => "location_panel",
            WidgetSettings::Html { .. } => "html",
        }
    }
}
