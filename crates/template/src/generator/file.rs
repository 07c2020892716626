//! `{oneFromFile:<path>[#<encoding>]}` -- 파일에서 임의의 라인

use std::path::Path;

use rand::seq::SliceRandom;

use super::TagSite;
use crate::engine::Evaluation;
use crate::error::TemplateError;

/// 캐시된 파일 라인 중 하나를 균등하게 고릅니다.
pub(super) fn pick_line(
    eval: &mut Evaluation<'_>,
    site: &TagSite<'_>,
) -> Result<String, TemplateError> {
    let args = eval.resolve_args(site.args()?)?;
    let (path, encoding) = match args.rsplit_once('#') {
        Some((path, encoding)) => (path, Some(encoding)),
        None => (&*args, None),
    };
    if path.trim().is_empty() {
        return Err(site.malformed("empty file path"));
    }

    let lines = eval.ctx.file_lines(Path::new(path.trim()), encoding)?;
    lines
        .choose(&mut *eval.rng)
        .cloned()
        .ok_or_else(|| site.malformed("file has no lines"))
}
