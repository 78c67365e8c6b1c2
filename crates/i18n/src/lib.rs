use std::collections::BTreeMap;

use scribe_core::UiLanguage;

#[derive(Debug, Clone)]
pub struct I18n {
    lang: UiLanguage,
    zh_cn: BTreeMap<&'static str, &'static str>,
    en_us: BTreeMap<&'static str, &'static str>,
}

impl I18n {
    pub fn new(lang: UiLanguage) -> Self {
        Self {
            lang,
            zh_cn: zh_cn_map(),
            en_us: en_us_map(),
        }
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        match self.lang {
            UiLanguage::ZhCn => self
                .zh_cn
                .get(key)
                .copied()
                .or_else(|| self.en_us.get(key).copied())
                .unwrap_or(key),
            UiLanguage::EnUs => self
                .en_us
                .get(key)
                .copied()
                .or_else(|| self.zh_cn.get(key).copied())
                .unwrap_or(key),
        }
    }
}

fn zh_cn_map() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("app.title", "Scribe 笔记"),
        ("header.editing", "编辑中"),
        ("header.drafting", "草稿"),
        ("header.untitled", "未命名"),
        ("notice.saved", "已保存"),
        ("notice.note_created", "笔记已创建"),
        ("notice.copied", "已复制"),
        ("notice.copy_failed", "复制失败。"),
        ("notice.persist_failed", "笔记写入存储失败。"),
        ("notice.analysis_clean", "文本看起来不错！"),
        ("notice.analysis_failed", "分析失败。"),
        ("notice.rewrite_ready", "改写建议已就绪"),
        ("notice.rewrite_failed", "改写失败。"),
        ("notice.ai_unavailable", "AI 功能不可用：未配置 API 密钥。"),
        ("notice.speech_unsupported", "当前平台不支持语音识别。"),
        ("notice.speech_no_speech", "未检测到语音，已停止。"),
        ("notice.speech_network", "网络错误，请检查连接。"),
        ("notice.speech_not_allowed", "麦克风权限被拒绝。"),
    ])
}

fn en_us_map() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        ("app.title", "Scribe"),
        ("header.editing", "Editing"),
        ("header.drafting", "Drafting"),
        ("header.untitled", "Untitled"),
        ("notice.saved", "Saved"),
        ("notice.note_created", "Note created"),
        ("notice.copied", "Copied"),
        ("notice.copy_failed", "Copy failed."),
        ("notice.persist_failed", "Could not write notes to storage."),
        ("notice.analysis_clean", "Text looks good!"),
        ("notice.analysis_failed", "Analysis failed."),
        ("notice.rewrite_ready", "Rewrite suggestion ready"),
        ("notice.rewrite_failed", "Rewrite failed."),
        (
            "notice.ai_unavailable",
            "AI features are unavailable: API key not configured.",
        ),
        (
            "notice.speech_unsupported",
            "Speech recognition is not supported on this platform.",
        ),
        ("notice.speech_no_speech", "No speech detected. Stopped."),
        ("notice.speech_network", "Network error. Check connection."),
        ("notice.speech_not_allowed", "Microphone permission denied."),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_chinese_translation() {
        let i18n = I18n::new(UiLanguage::ZhCn);
        assert_eq!(i18n.t("notice.saved"), "已保存");
    }

    #[test]
    fn falls_back_to_key_when_missing() {
        let i18n = I18n::new(UiLanguage::EnUs);
        assert_eq!(i18n.t("not.exists"), "not.exists");
    }

    #[test]
    fn both_catalogs_cover_the_same_keys() {
        let en: Vec<_> = en_us_map().into_keys().collect();
        let zh: Vec<_> = zh_cn_map().into_keys().collect();
        assert_eq!(en, zh);
    }
}
