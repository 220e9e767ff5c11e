use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default query preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC), folds half-width kana and full-width latin
        let text: String = text.nfkc().collect();

        text.replace(['\n', '\r'], "").trim().to_string()
    }
}

pub struct QueryPreprocessor;
impl Preprocessor for QueryPreprocessor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_folds_width_and_newlines() {
        let processed = QueryPreprocessor.process("  ﾈｺ\r\n");
        assert_eq!(processed, "ネコ");

        let processed = QueryPreprocessor.process("ｉｍｐａｉｒｍｅｎｔ");
        assert_eq!(processed, "impairment");
    }

    #[test]
    fn test_process_blank() {
        assert_eq!(QueryPreprocessor.process(" \n "), "");
    }
}
