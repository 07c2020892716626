//! 카운터 생성기 -- `{counter[:<name>]:<start>}`, `{cmr[:<name>]}`

use std::sync::LazyLock;

use regex::Regex;

use super::{Grammar, TagSite, grammar, optional_name};
use crate::engine::Evaluation;
use crate::error::TemplateError;
use crate::state::DEFAULT_NAME;

static COUNTER: Grammar = LazyLock::new(|| Regex::new(r"^:(?:([^:]+):)?\s*(-?\d+)\s*$"));

/// 이름별 카운터의 현재 값을 반환하고 1 증가시킵니다.
pub(super) fn next(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let body = eval.resolve_args(site.body)?;
    let (name, start) = parse_counter(&body)?
        .ok_or_else(|| site.malformed("expected ':<start>' or ':<name>:<start>' with integer start"))?;
    Ok(eval.ctx.next_counter(name, start).to_string())
}

fn parse_counter(body: &str) -> Result<Option<(&str, i64)>, TemplateError> {
    let Some(caps) = grammar(&COUNTER)?.captures(body) else {
        return Ok(None);
    };
    let name = caps.get(1).map_or(DEFAULT_NAME, |m| m.as_str());
    Ok(caps[2].parse().ok().map(|start| (name, start)))
}

/// 카운터 값을 증가 없이 반환합니다. 없으면 빈 문자열입니다.
pub(super) fn recall(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let name = optional_name(site)?;
    Ok(eval
        .ctx
        .counter(name)
        .map(|value| value.to_string())
        .unwrap_or_default())
}
