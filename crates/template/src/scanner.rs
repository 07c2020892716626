//! 표현식 경계 스캐너
//!
//! 중첩 태그를 포함한 `{...}` 구간의 끝을 찾습니다. 재귀 정규식 없이
//! 괄호 깊이만 세며, 태그 인자 문법은 여기서 잘라낸 구간에만 적용됩니다.

use crate::error::TemplateError;

/// `open`의 `{`에 짝이 맞는 `}` 바로 다음 바이트 인덱스를 반환합니다.
///
/// 깊이는 여는 괄호에서 1로 시작하며, 0으로 돌아오기 전에 문자열이 끝나면
/// `MalformedTag` 에러를 반환합니다.
///
/// ```
/// use loggen_template::scanner::scan;
///
/// let text = "test {first:a,b,{second:d,e}}";
/// assert_eq!(scan(text, 5).unwrap(), 29);
/// ```
pub fn scan(text: &str, open: usize) -> Result<usize, TemplateError> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return Err(TemplateError::malformed(
            excerpt(text, open),
            format!("expected '{{' at offset {open}"),
        ));
    }

    let mut depth = 0usize;
    for (idx, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(idx + 1);
                }
            }
            _ => {}
        }
    }

    Err(TemplateError::malformed(
        excerpt(text, open),
        format!("unbalanced braces: {depth} left open"),
    ))
}

/// 텍스트에서 `{keyword`로 시작하는 첫 태그의 시작 인덱스를 찾습니다.
///
/// 키워드 바로 뒤는 `:`, `/`, `}` 중 하나여야 합니다.
/// 따라서 `{ms` 검색이 `{msg}`에 걸리지 않습니다.
pub fn find_tag(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(pos) = text[from..].find('{') {
        let start = from + pos;
        let after = start + 1;
        if text[after..].starts_with(keyword)
            && matches!(bytes.get(after + keyword.len()), Some(b':' | b'/' | b'}'))
        {
            return Some(start);
        }
        from = after;
    }
    None
}

/// 괄호 깊이 0인 위치에서만 구분자로 나눕니다.
///
/// `a,{random:1-9},b`를 `,`로 나누면 세 조각이 됩니다.
pub fn split_top_level<'a>(text: &'a str, delim: &str) -> Vec<&'a str> {
    if delim.is_empty() {
        return vec![text];
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;
    let mut iter = text.char_indices();
    while let Some((idx, ch)) = iter.next() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[idx..].starts_with(delim) => {
                parts.push(&text[last..idx]);
                last = idx + delim.len();
                // 구분자의 나머지 문자 건너뛰기
                for _ in 1..delim.chars().count() {
                    iter.next();
                }
            }
            _ => {}
        }
    }
    parts.push(&text[last..]);
    parts
}

/// 괄호 깊이 0에서 마지막으로 나타나는 `sep` 위치로 한 번 나눕니다.
pub fn rsplit_top_level_once(text: &str, sep: char) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut found = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => found = Some(idx),
            _ => {}
        }
    }
    found.map(|idx| (&text[..idx], &text[idx + sep.len_utf8()..]))
}

/// 에러 메시지용 발췌 (최대 64 바이트)
fn excerpt(text: &str, start: usize) -> String {
    let start = start.min(text.len());
    let mut end = (start + 64).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut begin = start;
    while !text.is_char_boundary(begin) {
        begin -= 1;
    }
    text[begin..end].to_owned()
}
