//! 생성기 카탈로그 -- 태그 키워드별 핸들러 디스패치 테이블
//!
//! 각 생성기는 자기 키워드의 첫 번째 태그 하나만 해석합니다.
//!
//! 1. 평문 검색으로 `{keyword` 위치를 찾고
//! 2. [`scan`](crate::scanner::scan)으로 전체 구간을 잘라낸 뒤
//! 3. 구간에 인자 문법을 적용해 대체 문자열을 계산하고
//! 4. `prefix + replacement + suffix`로 이어 붙입니다.
//!
//! 나머지 태그는 건드리지 않으며, 남은 태그는 고정점 루프의 다음 패스가 처리합니다.
//!
//! # 등록 순서
//! [`REGISTRY`] 순서대로 매 패스마다 한 번씩 실행됩니다. `repeat`와 선택
//! 생성기(`oneOf`, `prob`)가 먼저 실행되어, 반복 본문과 선택되지 않은 분기
//! 안의 태그가 미리 해석되지 않습니다. `ms`는 `mr`보다 먼저 실행됩니다.

mod choice;
mod counter;
mod date;
mod file;
mod memory;
mod network;
mod random;
mod text;

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::Evaluation;
use crate::error::TemplateError;
use crate::scanner::{find_tag, scan};

/// 최초 사용 시 컴파일되는 인자 문법 정규식
pub(crate) type Grammar = LazyLock<Result<Regex, regex::Error>>;

/// 문법 정규식을 꺼냅니다. 컴파일 실패는 태그 문법 오류와 구분됩니다.
pub(crate) fn grammar(cell: &'static Grammar) -> Result<&'static Regex, TemplateError> {
    cell.as_ref().map_err(|e| TemplateError::Grammar {
        reason: e.to_string(),
    })
}

/// 생성기 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// `{repeat:<times>#<text>[#<delim>]#}`
    Repeat,
    /// `{oneOf:<opts>[/<delim>]}`
    OneOf,
    /// `{prob:<opt>[/<weight>],...}`
    WeightedChoice,
    /// `{ms[:<name>]/<value>}`
    MemorySet,
    /// `{date:<pattern>[/<locale>]}`
    Date,
    /// `{random:<from>-<to>}`
    RandomNumber,
    /// `{string:<charclass>/<length>}`
    RandomString,
    /// `{lorem:<count>:<words>/<delim>}`
    WordList,
    /// `{counter[:<name>]:<start>}`
    Counter,
    /// `{cmr[:<name>]}`
    CounterRecall,
    /// `{mr[:<name>]}`
    MemoryRecall,
    /// `{ipv4:<addr>/<cidr>}`
    Ipv4,
    /// `{pri:}`
    Priority,
    /// `{oneFromFile:<path>[#<encoding>]}`
    LineFromFile,
}

/// 고정점 루프가 매 패스마다 순회하는 생성기 목록
pub const REGISTRY: [GeneratorKind; 14] = [
    GeneratorKind::Repeat,
    GeneratorKind::OneOf,
    GeneratorKind::WeightedChoice,
    GeneratorKind::MemorySet,
    GeneratorKind::Date,
    GeneratorKind::RandomNumber,
    GeneratorKind::RandomString,
    GeneratorKind::WordList,
    GeneratorKind::Counter,
    GeneratorKind::CounterRecall,
    GeneratorKind::MemoryRecall,
    GeneratorKind::Ipv4,
    GeneratorKind::Priority,
    GeneratorKind::LineFromFile,
];

impl GeneratorKind {
    /// 태그 키워드 (`{` 바로 뒤 이름)
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Repeat => "repeat",
            Self::OneOf => "oneOf",
            Self::WeightedChoice => "prob",
            Self::MemorySet => "ms",
            Self::Date => "date",
            Self::RandomNumber => "random",
            Self::RandomString => "string",
            Self::WordList => "lorem",
            Self::Counter => "counter",
            Self::CounterRecall => "cmr",
            Self::MemoryRecall => "mr",
            Self::Ipv4 => "ipv4",
            Self::Priority => "pri",
            Self::LineFromFile => "oneFromFile",
        }
    }

    /// 키워드로 생성기를 찾습니다.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        REGISTRY.into_iter().find(|kind| kind.keyword() == keyword)
    }

    /// 텍스트에서 이 생성기의 첫 태그 하나를 해석합니다.
    ///
    /// 태그가 없으면 `None`을 반환합니다.
    pub(crate) fn apply(
        self,
        eval: &mut Evaluation<'_>,
        text: &str,
    ) -> Result<Option<String>, TemplateError> {
        let Some(site) = TagSite::locate(text, self.keyword())? else {
            return Ok(None);
        };

        let replacement = match self {
            Self::Repeat => text::repeat(eval, &site)?,
            Self::OneOf => choice::one_of(eval, &site)?,
            Self::WeightedChoice => choice::weighted(eval, &site)?,
            Self::MemorySet => memory::set(eval, &site)?,
            Self::Date => date::format(eval, &site)?,
            Self::RandomNumber => random::number(eval, &site)?,
            Self::RandomString => text::random_string(eval, &site)?,
            Self::WordList => text::lorem(eval, &site)?,
            Self::Counter => counter::next(eval, &site)?,
            Self::CounterRecall => counter::recall(eval, &site)?,
            Self::MemoryRecall => memory::recall(eval, &site)?,
            Self::Ipv4 => network::ipv4(eval, &site)?,
            Self::Priority => network::priority(eval, &site)?,
            Self::LineFromFile => file::pick_line(eval, &site)?,
        };

        tracing::trace!(
            tag = site.span,
            replacement = replacement.as_str(),
            "resolved tag"
        );
        Ok(Some(site.splice(text, &replacement)))
    }
}

/// 텍스트 안에서 찾은 태그 하나의 위치
#[derive(Debug, Clone, Copy)]
pub(crate) struct TagSite<'t> {
    /// `{` 위치
    start: usize,
    /// 닫는 `}` 다음 위치
    end: usize,
    /// 태그 전체 (`{random:1-5}`)
    pub(crate) span: &'t str,
    /// 키워드와 닫는 괄호 사이 (`:1-5`)
    pub(crate) body: &'t str,
}

impl<'t> TagSite<'t> {
    fn locate(text: &'t str, keyword: &str) -> Result<Option<Self>, TemplateError> {
        let Some(start) = find_tag(text, keyword) else {
            return Ok(None);
        };
        let end = scan(text, start)?;
        let span = &text[start..end];
        let body = &span[1 + keyword.len()..span.len() - 1];
        Ok(Some(Self {
            start,
            end,
            span,
            body,
        }))
    }

    /// `:`로 시작하는 인자 부분을 반환합니다.
    pub(crate) fn args(&self) -> Result<&'t str, TemplateError> {
        self.body
            .strip_prefix(':')
            .ok_or_else(|| self.malformed("expected ':' after tag name"))
    }

    /// 이 태그에 대한 `MalformedTag` 에러를 만듭니다.
    pub(crate) fn malformed(&self, detail: impl Into<String>) -> TemplateError {
        TemplateError::malformed(self.span, detail)
    }

    fn splice(&self, text: &str, replacement: &str) -> String {
        let mut out =
            String::with_capacity(text.len() - (self.end - self.start) + replacement.len());
        out.push_str(&text[..self.start]);
        out.push_str(replacement);
        out.push_str(&text[self.end..]);
        out
    }
}

/// `[:name]` 형태의 선택적 이름 접미사를 해석합니다.
pub(crate) fn optional_name<'t>(site: &TagSite<'t>) -> Result<&'t str, TemplateError> {
    if site.body.is_empty() {
        return Ok(crate::state::DEFAULT_NAME);
    }
    match site.body.strip_prefix(':') {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(site.malformed("expected ':<name>' or nothing after tag name")),
    }
}
