//! 선택 생성기 -- `{oneOf:...}`, `{prob:...}`
//!
//! 선택지는 최상위 레벨에서만 분리되며, 선택된 분기는 해석하지 않은 채
//! 그대로 삽입됩니다. 분기 안의 태그는 다음 패스에서 해석됩니다.

use rand::Rng;
use rand::seq::SliceRandom;

use super::TagSite;
use crate::engine::Evaluation;
use crate::error::TemplateError;
use crate::scanner::{rsplit_top_level_once, split_top_level};

/// 구분자를 생략했을 때의 기본 구분자
const DEFAULT_DELIMITER: &str = ",";

/// 선택지 중 하나를 균등하게 고릅니다.
pub(super) fn one_of(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = site.args()?;
    let (options, delimiter) = split_delimiter(args);
    let choices = split_top_level(options, delimiter);
    if choices.iter().all(|c| c.is_empty()) {
        return Err(site.malformed("no options to choose from"));
    }

    choices
        .choose(&mut *eval.rng)
        .map(|c| (*c).to_owned())
        .ok_or_else(|| site.malformed("no options to choose from"))
}

/// 마지막 최상위 `/` 뒤가 영숫자와 괄호 없는 문자열이면 구분자로 취급합니다.
fn split_delimiter(args: &str) -> (&str, &str) {
    match rsplit_top_level_once(args, '/') {
        Some((options, suffix))
            if !suffix.is_empty()
                && !suffix
                    .chars()
                    .any(|c| c.is_alphanumeric() || c == '{' || c == '}') =>
        {
            (options, suffix)
        }
        _ => (args, DEFAULT_DELIMITER),
    }
}

/// 가중치에 비례해 선택지 하나를 고릅니다. 가중치 생략 시 1입니다.
///
/// 마지막 최상위 `/` 뒤가 정수가 아니면 `/api/users`처럼 선택지 전체를 값으로 봅니다.
pub(super) fn weighted(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = site.args()?;
    let options = split_top_level(args, ",")
        .into_iter()
        .map(|option| parse_weighted(option).map_err(|detail| site.malformed(detail)))
        .collect::<Result<Vec<_>, _>>()?;

    let total: u64 = options
        .iter()
        .try_fold(0u64, |acc, (_, w)| acc.checked_add(*w))
        .ok_or_else(|| site.malformed("weights overflow"))?;
    if total == 0 {
        return Err(site.malformed("total weight is zero"));
    }

    let mut pick = eval.rng.gen_range(1..=total);
    for (option, weight) in &options {
        if pick <= *weight {
            return Ok((*option).to_owned());
        }
        pick -= weight;
    }
    Err(site.malformed("weighted pick out of range"))
}

fn parse_weighted(option: &str) -> Result<(&str, u64), String> {
    let Some((value, weight)) = rsplit_top_level_once(option, '/') else {
        return Ok((option, 1));
    };
    let weight = weight.trim();
    let digits = weight.strip_prefix('-').unwrap_or(weight);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok((option, 1));
    }
    weight
        .parse()
        .map(|w| (value, w))
        .map_err(|_| format!("weight '{weight}' is not a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_suffix_without_alphanumerics() {
        assert_eq!(split_delimiter("a|b|c/|"), ("a|b|c", "|"));
        assert_eq!(split_delimiter("a;b/;"), ("a;b", ";"));
    }

    #[test]
    fn slash_inside_option_is_not_delimiter() {
        assert_eq!(split_delimiter("/api/users,/api/orders"), ("/api/users,/api/orders", ","));
        assert_eq!(split_delimiter("a,b"), ("a,b", ","));
    }

    #[test]
    fn slash_inside_nested_tag_is_ignored() {
        assert_eq!(
            split_delimiter("{string:a-z/4},x"),
            ("{string:a-z/4},x", ",")
        );
    }

    #[test]
    fn weighted_option_parsing() {
        assert_eq!(parse_weighted("GET/8"), Ok(("GET", 8)));
        assert_eq!(parse_weighted("POST"), Ok(("POST", 1)));
        assert_eq!(parse_weighted("{random:1-5}/0"), Ok(("{random:1-5}", 0)));
        assert_eq!(parse_weighted(" GET / 8 "), Ok((" GET ", 8)));
    }

    #[test]
    fn non_numeric_suffix_stays_in_value() {
        assert_eq!(parse_weighted("/api/users"), Ok(("/api/users", 1)));
        assert_eq!(parse_weighted("/api/users/3"), Ok(("/api/users", 3)));
        assert_eq!(parse_weighted("x/heavy"), Ok(("x/heavy", 1)));
        assert_eq!(parse_weighted("x/"), Ok(("x/", 1)));
    }

    #[test]
    fn negative_or_overflowing_weight_is_error() {
        assert!(parse_weighted("x/-2").is_err());
        assert!(parse_weighted("x/99999999999999999999").is_err());
    }
}
