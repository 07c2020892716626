//! 네트워크 생성기 -- `{ipv4:<addr>/<cidr>}`, `{pri:}`

use std::net::Ipv4Addr;

use rand::Rng;

use super::TagSite;
use crate::engine::Evaluation;
use crate::error::TemplateError;

/// syslog facility 최댓값 (local7)
const MAX_FACILITY: u8 = 23;
/// syslog severity 최댓값 (debug)
const MAX_SEVERITY: u8 = 7;

/// 서브넷 안의 주소 하나를 균등하게 뽑습니다. `/32`는 주소 자신입니다.
pub(super) fn ipv4(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    let args = eval.resolve_args(site.args()?)?;
    let (network, mask) = parse_subnet(&args).map_err(|detail| site.malformed(detail))?;
    let host = eval.rng.gen_range(0..=!mask);
    Ok(Ipv4Addr::from(network | host).to_string())
}

/// `addr/cidr`를 (네트워크 주소, 넷마스크)로 해석합니다.
fn parse_subnet(args: &str) -> Result<(u32, u32), String> {
    let (addr, cidr) = args
        .trim()
        .split_once('/')
        .ok_or_else(|| "expected '<addr>/<cidr>'".to_owned())?;
    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|_| format!("'{addr}' is not an IPv4 address"))?;
    let cidr: u32 = cidr
        .parse()
        .ok()
        .filter(|c| *c <= 32)
        .ok_or_else(|| format!("'{cidr}' is not a prefix length in 0..=32"))?;

    let mask = if cidr == 0 { 0 } else { u32::MAX << (32 - cidr) };
    Ok((u32::from(addr) & mask, mask))
}

/// syslog PRI 값 `8 * facility + severity`를 뽑습니다.
pub(super) fn priority(eval: &mut Evaluation<'_>, site: &TagSite<'_>) -> Result<String, TemplateError> {
    if !matches!(site.body, "" | ":") {
        return Err(site.malformed("priority takes no arguments"));
    }
    let facility = eval.rng.gen_range(0..=MAX_FACILITY);
    let severity = eval.rng.gen_range(0..=MAX_SEVERITY);
    Ok((u16::from(facility) * 8 + u16::from(severity)).to_string())
}
