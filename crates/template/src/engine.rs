//! 고정점 치환 드라이버
//!
//! [`substitute`]는 번역 맵을 한 번 적용한 뒤, 한 패스 동안 텍스트가 바뀌지
//! 않을 때까지 [`REGISTRY`](crate::generator::REGISTRY)의 모든 생성기를
//! 순서대로 반복 실행합니다. 한 생성기가 만든 결과(예: 선택된 `oneOf` 분기)
//! 안의 태그는 다음 패스에서 해석됩니다.
//!
//! # 사용 예시
//! ```
//! use std::collections::BTreeMap;
//! use chrono::Utc;
//! use loggen_template::{GenerationContext, substitute};
//!
//! let ctx = GenerationContext::new();
//! let line = substitute(&ctx, "{ms/40} {mr}", &BTreeMap::new(), Utc::now().fixed_offset())?;
//! assert_eq!(line, "40 40");
//! # Ok::<(), loggen_template::TemplateError>(())
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use rand::RngCore;

use loggen_core::config::GeneratorConfig;
use loggen_core::metrics as m;

use crate::error::TemplateError;
use crate::generator::REGISTRY;
use crate::state::GenerationContext;

/// `{key}` -> 값 번역 맵
pub type Translations = BTreeMap<String, String>;

/// 치환 엔진 한계 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// 고정점 루프 최대 패스 수 (평가 단위별)
    pub max_passes: usize,
    /// 재귀 평가 최대 깊이 (`ms`, `repeat`, 인자 사전 해석)
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: 10_000,
            max_depth: 64,
        }
    }
}

impl EngineConfig {
    /// core의 `GeneratorConfig`에서 엔진 한계를 가져옵니다.
    pub fn from_core(core: &GeneratorConfig) -> Self {
        Self {
            max_passes: core.max_passes,
            max_depth: core.max_depth,
        }
    }
}

/// 기본 한계와 스레드 로컬 난수로 템플릿을 치환합니다.
pub fn substitute(
    ctx: &GenerationContext,
    template: &str,
    translations: &Translations,
    instant: DateTime<FixedOffset>,
) -> Result<String, TemplateError> {
    substitute_with(
        ctx,
        &EngineConfig::default(),
        template,
        translations,
        instant,
        &mut rand::thread_rng(),
    )
}

/// 한계 설정과 난수 생성기를 지정해 템플릿을 치환합니다.
///
/// 1. `translations`의 정확한 `{key}`를 한 번만 치환
/// 2. 한 패스 전후 텍스트가 같아질 때까지 모든 생성기를 순서대로 실행
///
/// 태그 문법 위반은 호출 전체를 실패시키며 부분 결과는 없습니다.
pub fn substitute_with(
    ctx: &GenerationContext,
    config: &EngineConfig,
    template: &str,
    translations: &Translations,
    instant: DateTime<FixedOffset>,
    rng: &mut dyn RngCore,
) -> Result<String, TemplateError> {
    let text = apply_translations(template, translations);
    let mut eval = Evaluation {
        ctx,
        rng,
        instant,
        config,
        depth: 0,
    };
    eval.run(text)
}

/// 정확히 일치하는 `{key}`(콜론 없음)를 번역 맵의 값으로 한 번에 치환합니다.
///
/// 치환된 값은 다시 검사하지 않습니다.
pub fn apply_translations(template: &str, translations: &Translations) -> String {
    if translations.is_empty() || !template.contains('{') {
        return template.to_owned();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        if let Some(close) = after.find(['{', '}']) {
            let key = &after[..close];
            if after.as_bytes()[close] == b'}' && !key.contains(':') {
                if let Some(value) = translations.get(key) {
                    out.push_str(value);
                    rest = &after[close + 1..];
                    continue;
                }
            }
        }
        out.push('{');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// 한 번의 평가 단위 (최상위 호출 또는 재귀 평가)
pub(crate) struct Evaluation<'a> {
    pub(crate) ctx: &'a GenerationContext,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) instant: DateTime<FixedOffset>,
    config: &'a EngineConfig,
    depth: usize,
}

impl Evaluation<'_> {
    fn run(&mut self, mut text: String) -> Result<String, TemplateError> {
        for pass in 1..=self.config.max_passes {
            let before = text.clone();
            for kind in REGISTRY {
                if let Some(next) = kind.apply(self, &text)? {
                    text = next;
                }
            }
            if text == before {
                tracing::trace!(passes = pass, depth = self.depth, "reached fixed point");
                return Ok(text);
            }
        }

        Err(TemplateError::malformed(
            "template",
            format!(
                "no fixed point after {} passes (tag output keeps re-introducing tags)",
                self.config.max_passes
            ),
        ))
    }

    /// 텍스트를 새 평가 단위로 해석합니다 (번역 맵 없음).
    pub(crate) fn resolve(&mut self, text: &str) -> Result<String, TemplateError> {
        if self.depth >= self.config.max_depth {
            return Err(TemplateError::malformed(
                "template",
                format!("nesting exceeds max depth {}", self.config.max_depth),
            ));
        }

        let mut nested = Evaluation {
            ctx: self.ctx,
            rng: &mut *self.rng,
            instant: self.instant,
            config: self.config,
            depth: self.depth + 1,
        };
        nested.run(text.to_owned())
    }

    /// 리터럴이어야 하는 인자에 중첩 태그가 있으면 먼저 해석합니다.
    pub(crate) fn resolve_args<'t>(&mut self, args: &'t str) -> Result<Cow<'t, str>, TemplateError> {
        if args.contains('{') {
            self.resolve(args).map(Cow::Owned)
        } else {
            Ok(Cow::Borrowed(args))
        }
    }
}

/// 장기 실행 호출자를 위한 엔진 핸들
///
/// 한계 설정, 공유 생성 상태, 번역 맵을 묶어 여러 라인을 렌더링합니다.
///
/// # 사용 예시
/// ```
/// use std::sync::Arc;
/// use loggen_template::{GenerationContext, TemplateEngine};
///
/// let engine = TemplateEngine::new(Arc::new(GenerationContext::new()));
/// let lines = engine.render_lines("seq={counter:seq:1}", 3)?;
/// assert_eq!(lines, vec!["seq=1", "seq=2", "seq=3"]);
/// # Ok::<(), loggen_template::TemplateError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    config: EngineConfig,
    context: Arc<GenerationContext>,
    translations: Translations,
}

impl TemplateEngine {
    /// 기본 한계와 빈 번역 맵으로 엔진을 생성합니다.
    pub fn new(context: Arc<GenerationContext>) -> Self {
        Self {
            config: EngineConfig::default(),
            context,
            translations: Translations::new(),
        }
    }

    /// core 설정에서 한계와 번역 맵을 가져와 엔진을 생성합니다.
    pub fn from_core(context: Arc<GenerationContext>, core: &GeneratorConfig) -> Self {
        Self::new(context)
            .with_config(EngineConfig::from_core(core))
            .with_translations(core.translations.clone())
    }

    /// 한계 설정을 지정합니다.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// 번역 맵을 지정합니다.
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.translations = translations;
        self
    }

    /// 번역 항목 하나를 추가합니다.
    pub fn translate(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations.insert(key.into(), value.into());
        self
    }

    /// 공유 생성 상태를 반환합니다.
    pub fn context(&self) -> &Arc<GenerationContext> {
        &self.context
    }

    /// 한계 설정을 반환합니다.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 현재 시각 기준으로 템플릿을 렌더링합니다.
    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        self.render_at(template, Local::now().fixed_offset())
    }

    /// 지정한 기준 시각으로 템플릿을 렌더링합니다.
    pub fn render_at(
        &self,
        template: &str,
        instant: DateTime<FixedOffset>,
    ) -> Result<String, TemplateError> {
        self.render_with_rng(template, instant, &mut rand::thread_rng())
    }

    /// 기준 시각과 난수 생성기를 지정해 렌더링합니다.
    pub fn render_with_rng(
        &self,
        template: &str,
        instant: DateTime<FixedOffset>,
        rng: &mut dyn RngCore,
    ) -> Result<String, TemplateError> {
        let result = substitute_with(
            &self.context,
            &self.config,
            template,
            &self.translations,
            instant,
            rng,
        );

        match &result {
            Ok(_) => metrics::counter!(m::TEMPLATE_LINES_RENDERED_TOTAL).increment(1),
            Err(e) => {
                metrics::counter!(m::TEMPLATE_ERRORS_TOTAL, m::LABEL_KIND => e.kind())
                    .increment(1);
                tracing::debug!(error = %e, "template substitution failed");
            }
        }
        result
    }

    /// 같은 템플릿을 `count`번 렌더링합니다. 하나라도 실패하면 에러를 반환합니다.
    pub fn render_lines(&self, template: &str, count: usize) -> Result<Vec<String>, TemplateError> {
        (0..count).map(|_| self.render(template)).collect()
    }
}
