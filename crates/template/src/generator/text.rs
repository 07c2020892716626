//! 텍스트 생성기 -- `{repeat:...}`, `{string:...}`, `{lorem:...}`

use std::collections::HashSet;
use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use super::{Grammar, TagSite, grammar};
use crate::engine::Evaluation;
use crate::error::TemplateError;
use crate::scanner::split_top_level;

/// `<times>#<text>[#<delim>]#` 형태로 텍스트를 반복합니다.
///
/// 횟수만 먼저 해석하며, 본문은 반복된 뒤 다음 패스에서 복사본마다
/// 따로 해석됩니다.
pub(super) fn repeat(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = site.args()?;
    let parts = split_top_level(args, "#");
    let (times, text, delim) = match parts.as_slice() {
        [times, text, ""] => (*times, *text, ""),
        [times, text, delim, ""] => (*times, *text, *delim),
        _ => {
            return Err(site.malformed(
                "expected '<times>#<text>#' or '<times>#<text>#<delim>#'",
            ));
        }
    };

    let times = eval.resolve(times)?;
    let times: usize = times
        .trim()
        .parse()
        .map_err(|_| site.malformed(format!("repeat count '{times}' is not a number")))?;

    Ok(vec![text; times].join(delim))
}

/// 문자 클래스에서 복원 추출로 `length`개 문자를 뽑습니다.
pub(super) fn random_string(
    eval: &mut Evaluation<'_>,
    site: &TagSite<'_>,
) -> Result<String, TemplateError> {
    let args = eval.resolve_args(site.args()?)?;
    let (class, length) = args
        .rsplit_once('/')
        .ok_or_else(|| site.malformed("expected '<charclass>/<length>'"))?;
    let length: usize = length
        .trim()
        .parse()
        .map_err(|_| site.malformed(format!("length '{length}' is not a number")))?;
    let alphabet = expand_class(class).map_err(|detail| site.malformed(detail))?;

    Ok((0..length)
        .map(|_| alphabet[eval.rng.gen_range(0..alphabet.len())])
        .collect())
}

/// 문자 클래스 토큰: 이스케이프 여부를 보존합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassToken {
    Literal(char),
    Dash,
}

/// `a-z0-9_\-` 형태의 문자 클래스를 문자 목록으로 펼칩니다.
///
/// - `x-y`는 범위, 역순 범위는 에러
/// - `\-`(및 `\` 뒤 임의 문자)는 리터럴
/// - 맨 앞/맨 뒤의 `-`는 리터럴
/// - 이스케이프되지 않은 `--`는 에러
///
/// 중복 문자는 처음 등장한 순서로 한 번만 남깁니다.
fn expand_class(class: &str) -> Result<Vec<char>, String> {
    let mut tokens = Vec::new();
    let mut chars = class.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => tokens.push(ClassToken::Literal(escaped)),
                None => return Err(format!("dangling escape in character class '{class}'")),
            },
            '-' => tokens.push(ClassToken::Dash),
            other => tokens.push(ClassToken::Literal(other)),
        }
    }

    let mut out: Vec<char> = Vec::new();
    let mut seen: HashSet<char> = HashSet::new();
    let mut push = |c: char, out: &mut Vec<char>| {
        if seen.insert(c) {
            out.push(c);
        }
    };

    let mut i = 0;
    while i < tokens.len() {
        match (tokens[i], tokens.get(i + 1), tokens.get(i + 2)) {
            (ClassToken::Literal(lo), Some(ClassToken::Dash), Some(ClassToken::Literal(hi))) => {
                if lo > *hi {
                    return Err(format!("reversed range '{lo}-{hi}' in character class"));
                }
                for c in lo..=*hi {
                    push(c, &mut out);
                }
                i += 3;
            }
            (ClassToken::Dash, Some(ClassToken::Dash), _) => {
                return Err(format!("unescaped '--' in character class '{class}'"));
            }
            (ClassToken::Literal(c), _, _) => {
                push(c, &mut out);
                i += 1;
            }
            (ClassToken::Dash, _, _) => {
                push('-', &mut out);
                i += 1;
            }
        }
    }

    if out.is_empty() {
        return Err("empty character class".to_owned());
    }
    Ok(out)
}

static LOREM: Grammar = LazyLock::new(|| Regex::new(r"(?s)^(\d+):(.*)/(.+)$"));

/// 구분자로 나눈 단어 목록에서 `count`개 단어를 복원 추출해 같은 구분자로 잇습니다.
///
/// 빈 조각은 단어로 치지 않습니다.
pub(super) fn lorem(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = eval.resolve_args(site.args()?)?;
    let caps = grammar(&LOREM)?
        .captures(&args)
        .ok_or_else(|| site.malformed("expected '<count>:<words>/<delimiter>'"))?;

    let count: usize = caps[1]
        .parse()
        .map_err(|_| site.malformed(format!("word count '{}' is too large", &caps[1])))?;
    let delim = &caps[3];
    let words: Vec<&str> = caps[2].split(delim).filter(|w| !w.is_empty()).collect();
    if words.is_empty() && count > 0 {
        return Err(site.malformed("word list is empty"));
    }

    let picked: Vec<&str> = (0..count)
        .filter_map(|_| words.choose(&mut *eval.rng).copied())
        .collect();
    Ok(picked.join(delim))
}
