//! `{date:<pattern>[/<locale>]}` -- 기준 시각 포맷
//!
//! 패턴은 strftime 형식(`%Y-%m-%dT%H:%M:%S%.3f%:z`, `%b %e %H:%M:%S` 등)입니다.
//! 마지막 `/` 뒤가 알려진 로케일(`fr_FR`, `ko_KR`)이면 월/요일 이름을
//! 해당 로케일로 출력하고, 아니면 전체를 패턴으로 취급합니다.

use std::fmt::Write;

use chrono::Locale;
use chrono::format::{Item, StrftimeItems};

use super::TagSite;
use crate::engine::Evaluation;
use crate::error::TemplateError;

pub(super) fn format(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = eval.resolve_args(site.args()?)?;
    let (pattern, locale) = split_locale(&args);

    if pattern.is_empty() {
        return Err(site.malformed("empty date pattern"));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(site.malformed(format!("invalid date pattern '{pattern}'")));
    }

    let mut out = String::with_capacity(pattern.len() * 2);
    let written = match locale {
        Some(locale) => write!(out, "{}", eval.instant.format_localized(pattern, locale)),
        None => write!(out, "{}", eval.instant.format(pattern)),
    };
    written.map_err(|_| site.malformed(format!("cannot format date with '{pattern}'")))?;
    Ok(out)
}

fn split_locale(args: &str) -> (&str, Option<Locale>) {
    if let Some((pattern, suffix)) = args.rsplit_once('/') {
        if let Ok(locale) = Locale::try_from(suffix.trim()) {
            return (pattern, Some(locale));
        }
    }
    (args, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_suffix_is_detected() {
        let (pattern, locale) = split_locale("%d %B %Y/fr_FR");
        assert_eq!(pattern, "%d %B %Y");
        assert_eq!(locale, Some(Locale::fr_FR));
    }

    #[test]
    fn unknown_suffix_stays_in_pattern() {
        let (pattern, locale) = split_locale("%Y/%m/%d");
        assert_eq!(pattern, "%Y/%m/%d");
        assert_eq!(locale, None);
    }

    #[test]
    fn pattern_without_slash() {
        assert_eq!(split_locale("%H:%M"), ("%H:%M", None));
    }
}
