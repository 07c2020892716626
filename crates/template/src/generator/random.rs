//! `{random:<from>-<to>}` -- 범위 내 정수

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use super::{Grammar, TagSite, grammar};
use crate::engine::Evaluation;
use crate::error::TemplateError;

static RANGE: Grammar = LazyLock::new(|| Regex::new(r"^\s*(-?\d+)\s*-\s*(-?\d+)\s*$"));

/// `[from, to)` 구간의 정수를 균등하게 뽑습니다.
pub(super) fn number(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = eval.resolve_args(site.args()?)?;
    let (from, to) = parse_range(&args)?.ok_or_else(|| {
        site.malformed("expected '<from>-<to>' with integer bounds")
    })?;
    if from >= to {
        return Err(site.malformed(format!("empty range {from}-{to}")));
    }
    Ok(eval.rng.gen_range(from..to).to_string())
}

fn parse_range(args: &str) -> Result<Option<(i64, i64)>, TemplateError> {
    let Some(caps) = grammar(&RANGE)?.captures(args) else {
        return Ok(None);
    };
    let bounds: Option<(i64, i64)> = caps[1].parse().ok().zip(caps[2].parse().ok());
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_accepts_negative_bounds() {
        assert_eq!(parse_range("1-5").unwrap(), Some((1, 5)));
        assert_eq!(parse_range("-10--2").unwrap(), Some((-10, -2)));
        assert_eq!(parse_range(" 3 - 9 ").unwrap(), Some((3, 9)));
    }

    #[test]
    fn parse_range_rejects_garbage() {
        assert_eq!(parse_range("a-b").unwrap(), None);
        assert_eq!(parse_range("5").unwrap(), None);
        assert_eq!(parse_range("1-2-3").unwrap(), None);
        assert_eq!(parse_range("").unwrap(), None);
    }
}
