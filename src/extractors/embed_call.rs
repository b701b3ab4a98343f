//! Reading JavaScript embed calls out of page source.
//!
//! OpenCourseWare pages start their player with a literal call such as
//!
//! ```text
//! ocw_embed_chapter_media('embed1', 'EObHWIEKGjA', 'youtube', '/courses/...', 'thumb.jpg', '0', '0', '/courses/.../lec07.srt')
//! ```
//!
//! The call is never executed; its argument list is tokenized here. Quoted
//! literals may contain commas and parentheses, quotes are stripped, and
//! unquoted nested brackets are kept balanced.

use crate::error::{ExtractorError, Result};
use tracing::debug;

/// Where the fields we need sit in a known call signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub function: &'static str,
    pub arity: usize,
    pub media_index: usize,
    pub captions_index: usize,
}

/// `ocw_embed_chapter_media(container_id, media_url, provider, page_url,
/// image_url, start, stop, captions_file)`
pub const CHAPTER_MEDIA: Signature = Signature {
    function: "ocw_embed_chapter_media",
    arity: 8,
    media_index: 1,
    captions_index: 7,
};

/// `ocw_embed_media(container_id, media_url, provider, page_url, image_url,
/// captions_file)`
pub const MEDIA: Signature = Signature {
    function: "ocw_embed_media",
    arity: 6,
    media_index: 1,
    captions_index: 5,
};

/// The two fields the course extractor reads from an embed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedCall {
    pub media_id: String,
    pub captions_file: String,
}

impl Signature {
    /// Find the first call to this function in `source` and pick out the
    /// media id and captions file.
    ///
    /// Returns `Ok(None)` when the function is never called.
    ///
    /// # Errors
    ///
    /// [`ExtractorError::Parse`] if the call is unterminated or has fewer
    /// arguments than the signature.
    pub fn find(&self, source: &str) -> Result<Option<EmbedCall>> {
        let Some(args) = find_call(source, self.function)? else {
            return Ok(None);
        };
        if args.len() < self.arity {
            return Err(ExtractorError::parse(
                self.function,
                format!("expected {} arguments, found {}", self.arity, args.len()),
            ));
        }
        if args.len() > self.arity {
            debug!(function = self.function, count = args.len(), "Ignoring extra embed arguments");
        }

        Ok(Some(EmbedCall {
            media_id: args[self.media_index].clone(),
            captions_file: args[self.captions_index].clone(),
        }))
    }
}

/// Arguments of the first call to `function` in `source`, quotes stripped.
pub fn find_call(source: &str, function: &str) -> Result<Option<Vec<String>>> {
    for (start, _) in source.match_indices(function) {
        let preceded_by_ident = source[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if preceded_by_ident {
            continue;
        }

        let rest = source[start + function.len()..].trim_start();
        let Some(arguments) = rest.strip_prefix('(') else {
            continue;
        };

        return match tokenize_arguments(arguments) {
            Some(args) => Ok(Some(args)),
            None => Err(ExtractorError::parse(function, "unterminated argument list")),
        };
    }
    Ok(None)
}

/// One argument being accumulated. Whitespace inside quotes is kept;
/// unquoted whitespace around the argument is dropped.
#[derive(Default)]
struct Argument {
    text: String,
    quoted_end: Option<usize>,
}

impl Argument {
    fn push_unquoted(&mut self, c: char) {
        if !(c.is_whitespace() && self.text.is_empty() && self.quoted_end.is_none()) {
            self.text.push(c);
        }
    }

    fn close_quote(&mut self) {
        self.quoted_end = Some(self.text.len());
    }

    fn is_blank(&self) -> bool {
        self.quoted_end.is_none() && self.text.trim().is_empty()
    }

    fn finish(self) -> String {
        let mut text = self.text;
        let tail_start = self.quoted_end.unwrap_or(0);
        let keep = tail_start + text[tail_start..].trim_end().len();
        text.truncate(keep);
        text
    }
}

/// Split the text following an opening parenthesis into arguments, stopping
/// at the matching closing parenthesis. `None` if it never closes.
fn tokenize_arguments(input: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = Argument::default();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => current.text.extend(chars.next()),
                c if c == q => {
                    quote = None;
                    current.close_quote();
                }
                c => current.text.push(c),
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => {
                depth += 1;
                current.push_unquoted(c);
            }
            ')' if depth == 0 => {
                if !(args.is_empty() && current.is_blank()) {
                    args.push(current.finish());
                }
                return Some(args);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push_unquoted(c);
            }
            ',' if depth == 0 => args.push(std::mem::take(&mut current).finish()),
            c => current.push_unquoted(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_arguments() {
        let args = find_call("f('a', \"b\",c ,  'd')", "f").unwrap().unwrap();
        assert_eq!(args, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_commas_and_parens_inside_quotes() {
        let source = r#"ocw_embed_media('e1', 'abc', 'youtube', '/page (part 1), intro', 'img.jpg', '/subs.srt');"#;
        let args = find_call(source, "ocw_embed_media").unwrap().unwrap();
        assert_eq!(args.len(), 6);
        assert_eq!(args[3], "/page (part 1), intro");
        assert_eq!(args[5], "/subs.srt");
    }

    #[test]
    fn test_nested_unquoted_call() {
        let args = find_call("f(g(1, 2), [3, 4], 'x')", "f").unwrap().unwrap();
        assert_eq!(args, vec!["g(1, 2)", "[3, 4]", "x"]);
    }

    #[test]
    fn test_escaped_quote() {
        let args = find_call(r"f('it\'s', 'ok')", "f").unwrap().unwrap();
        assert_eq!(args, vec!["it's", "ok"]);
    }

    #[test]
    fn test_whitespace_inside_quotes_is_kept() {
        let args = find_call("f( ' abc ' ,\"x \",  plain  , '')", "f").unwrap().unwrap();
        assert_eq!(args, vec![" abc ", "x ", "plain", ""]);
    }

    #[test]
    fn test_single_empty_string_argument() {
        assert_eq!(find_call("f('')", "f").unwrap().unwrap(), vec![""]);
    }

    #[test]
    fn test_empty_call() {
        assert_eq!(find_call("f()", "f").unwrap().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_name_must_not_be_suffix_of_other_identifier() {
        let source = "my_ocw_embed_media('x'); window.ocw_embed_media('a', 'b')";
        let args = find_call(source, "ocw_embed_media").unwrap().unwrap();
        assert_eq!(args, vec!["a", "b"]);
    }

    #[test]
    fn test_absent_and_unterminated() {
        assert_eq!(find_call("nothing", "f").unwrap(), None);
        assert_eq!(find_call("function f", "f").unwrap(), None);
        let err = find_call("f('a', 'b'", "f").unwrap_err();
        assert!(matches!(err, ExtractorError::Parse { .. }));
    }

    #[test]
    fn test_chapter_media_signature() {
        let source = "ocw_embed_chapter_media('c', 'VID', 'youtube', '/p', '/i.jpg', '10', '20', '/caps.srt')";
        let call = CHAPTER_MEDIA.find(source).unwrap().unwrap();
        assert_eq!(call.media_id, "VID");
        assert_eq!(call.captions_file, "/caps.srt");
        assert_eq!(MEDIA.find(source).unwrap(), None);
    }

    #[test]
    fn test_media_signature() {
        let source = "ocw_embed_media('c', 'VID', 'youtube', '/p', '/i.jpg', '/caps.srt')";
        let call = MEDIA.find(source).unwrap().unwrap();
        assert_eq!(call.media_id, "VID");
        assert_eq!(call.captions_file, "/caps.srt");
        assert_eq!(CHAPTER_MEDIA.find(source).unwrap(), None);
    }

    #[test]
    fn test_too_few_arguments() {
        let err = CHAPTER_MEDIA
            .find("ocw_embed_chapter_media('c', 'VID', 'youtube')")
            .unwrap_err();
        assert!(err.to_string().contains("expected 8 arguments, found 3"));
    }
}
