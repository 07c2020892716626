//! 공유 생성 상태 -- 카운터, 메모리, 파일 라인 캐시
//!
//! [`GenerationContext`]는 여러 치환 호출에 걸쳐 유지되는 상태를 담습니다.
//! 호출자가 소유하며 보통 `Arc`로 공유합니다.
//!
//! # 동시성
//! 세 맵 모두 `DashMap`으로 샤딩되어 있습니다. 같은 이름에 대한
//! read-modify-write는 엔트리 잠금 안에서 한 번에 수행되고,
//! 다른 이름은 서로 경합하지 않습니다. 파일 캐시는 키별 뮤텍스로
//! 최초 적재가 한 번만 일어나도록 보장합니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::error::TemplateError;

/// 이름을 생략한 카운터/메모리가 사용하는 기본 이름
pub const DEFAULT_NAME: &str = "default";

/// 파일 캐시 키: (경로, 정규화된 인코딩 이름)
type FileKey = (PathBuf, &'static str);

/// 키별 최초 적재 슬롯
type FileSlot = Arc<Mutex<Option<Arc<[String]>>>>;

/// 프로세스 수명 동안 유지되는 생성 상태
#[derive(Debug, Default)]
pub struct GenerationContext {
    /// 카운터: 이름 -> 다음 값
    counters: DashMap<String, i64>,
    /// 메모리: 이름 -> 마지막 저장 값
    memory: DashMap<String, String>,
    /// 파일 라인 캐시
    files: DashMap<FileKey, FileSlot>,
}

impl GenerationContext {
    /// 빈 컨텍스트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 카운터 값을 반환하고 1 증가시킵니다.
    ///
    /// 최초 호출이면 `start`를 반환하고 `start + 1`을 저장합니다.
    /// 이후 호출에서는 `start`를 무시합니다.
    pub fn next_counter(&self, name: &str, start: i64) -> i64 {
        let mut entry = self.counters.entry(name.to_owned()).or_insert(start);
        let value = *entry;
        *entry = value.wrapping_add(1);
        value
    }

    /// 카운터의 현재 저장 값을 증가 없이 반환합니다.
    pub fn counter(&self, name: &str) -> Option<i64> {
        self.counters.get(name).map(|v| *v)
    }

    /// 메모리에 값을 저장합니다.
    pub fn remember(&self, name: &str, value: impl Into<String>) {
        self.memory.insert(name.to_owned(), value.into());
    }

    /// 메모리에 마지막으로 저장된 값을 반환합니다.
    pub fn memory(&self, name: &str) -> Option<String> {
        self.memory.get(name).map(|v| v.clone())
    }

    /// 파일의 라인 목록을 반환합니다. 최초 요청 시 한 번만 적재합니다.
    ///
    /// `encoding`은 WHATWG 레이블(`utf-8`, `latin1`, `euc-kr` 등)이며
    /// 생략하면 UTF-8입니다. 적재 실패는 캐시되지 않습니다.
    pub fn file_lines(
        &self,
        path: &Path,
        encoding: Option<&str>,
    ) -> Result<Arc<[String]>, TemplateError> {
        let label = encoding.unwrap_or("utf-8");
        let encoding =
            encoding_rs::Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                TemplateError::malformed(
                    format!("{{oneFromFile:{}#{label}}}", path.display()),
                    format!("unknown encoding '{label}'"),
                )
            })?;

        let key = (path.to_path_buf(), encoding.name());
        // 샤드 잠금은 슬롯 복제 직후 해제되고, 적재는 키별 뮤텍스 안에서 수행
        let slot = Arc::clone(self.files.entry(key).or_default().value());
        let mut guard = slot.lock();
        if let Some(lines) = guard.as_ref() {
            return Ok(Arc::clone(lines));
        }

        let lines = load_lines(path, encoding)?;
        *guard = Some(Arc::clone(&lines));
        metrics::counter!(loggen_core::metrics::TEMPLATE_FILES_LOADED_TOTAL).increment(1);
        tracing::debug!(
            path = %path.display(),
            encoding = encoding.name(),
            lines = lines.len(),
            "loaded line file into cache"
        );
        Ok(lines)
    }

    /// 캐시에 적재된 파일 수를 반환합니다.
    pub fn cached_files(&self) -> usize {
        self.files
            .iter()
            .filter(|entry| entry.value().lock().is_some())
            .count()
    }

    /// 모든 카운터, 메모리, 파일 캐시를 비웁니다.
    pub fn clear(&self) {
        self.counters.clear();
        self.memory.clear();
        self.files.clear();
    }
}

fn load_lines(
    path: &Path,
    encoding: &'static encoding_rs::Encoding,
) -> Result<Arc<[String]>, TemplateError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TemplateError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            TemplateError::Io {
                path: path.display().to_string(),
                source: e,
            }
        }
    })?;

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "file contained malformed sequences, replaced with U+FFFD"
        );
    }

    let lines: Arc<[String]> = text.lines().map(str::to_owned).collect();
    if lines.is_empty() {
        return Err(TemplateError::malformed(
            format!("{{oneFromFile:{}}}", path.display()),
            "file has no lines",
        ));
    }
    Ok(lines)
}
