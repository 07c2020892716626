//! 메모리 생성기 -- `{ms[:<name>]/<value>}`, `{mr[:<name>]}`

use super::{TagSite, optional_name};
use crate::engine::Evaluation;
use crate::error::TemplateError;
use crate::state::DEFAULT_NAME;

/// 값을 번역 맵 없이 재귀 해석한 뒤 저장하고 그대로 반환합니다.
pub(super) fn set(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let (name, value) = split_name_value(site.body)
        .ok_or_else(|| site.malformed("expected '/<value>' or ':<name>/<value>'"))?;
    let value = eval.resolve(value)?;
    eval.ctx.remember(name, value.clone());
    Ok(value)
}

fn split_name_value(body: &str) -> Option<(&str, &str)> {
    if let Some(value) = body.strip_prefix('/') {
        return Some((DEFAULT_NAME, value));
    }
    let (name, value) = body.strip_prefix(':')?.split_once('/')?;
    (!name.is_empty()).then_some((name, value))
}

/// 마지막으로 저장된 값을 반환합니다. 없으면 빈 문자열입니다.
pub(super) fn recall(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let name = optional_name(site)?;
    Ok(eval.ctx.memory(name).unwrap_or_default())
}
