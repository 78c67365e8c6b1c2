use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UiLanguage {
    ZhCn,
    #[default]
    EnUs,
}

impl UiLanguage {
    /// BCP 47 tag, also used as the default recognizer language.
    pub fn tag(self) -> &'static str {
        match self {
            UiLanguage::ZhCn => "zh-CN",
            UiLanguage::EnUs => "en-US",
        }
    }
}
