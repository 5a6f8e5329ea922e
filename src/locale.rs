use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayLocale {
    #[default]
    EnUs,
    ZhCn,
    ZhTw,
}

impl DisplayLocale {
    /// Accepts tags like `zh-CN`, `zh_TW.UTF-8` or `en_us`; anything unrecognised is English.
    pub fn detect(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase().replace('-', "_");
        if tag.starts_with("zh_cn") || tag.starts_with("zh_sg") || tag == "zh_hans" {
            DisplayLocale::ZhCn
        } else if tag.starts_with("zh_tw") || tag.starts_with("zh_hk") || tag == "zh_hant" {
            DisplayLocale::ZhTw
        } else {
            DisplayLocale::EnUs
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayLocale::EnUs => "en_us",
            DisplayLocale::ZhCn => "zh_cn",
            DisplayLocale::ZhTw => "zh_tw",
        }
    }

    pub fn weekday_name(self, index: u8) -> &'static str {
        const EN: [&str; 7] = [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ];
        const ZH: [&str; 7] = ["星期日", "星期一", "星期二", "星期三", "星期四", "星期五", "星期六"];

        let names = match self {
            DisplayLocale::EnUs => &EN,
            DisplayLocale::ZhCn | DisplayLocale::ZhTw => &ZH,
        };
        names.get(usize::from(index)).copied().unwrap_or("")
    }
}

impl fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
