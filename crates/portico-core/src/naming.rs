// ── Naming scheme ──
//
// Every object portico creates is owned by exactly one exposure, and the
// control plane has no way to record that. Ownership lives in the name:
// each name starts with `{tag}-{owner}-`, where `owner` is a prefix-free
// encoding of the exposure UID. The scanner recovers ownership by prefix
// match, so all name construction goes through this module.
//
// Names only use ASCII letters, digits and `-`.

use sha2::{Digest, Sha256};

use portico_api::ObjectKind;

use crate::model::PortSpec;

/// Free-form components (port and node names) longer than this are
/// shortened and suffixed with a digest.
const MAX_COMPONENT_LEN: usize = 40;
const TRUNCATED_COMPONENT_LEN: usize = 31;

/// UIDs longer than this are encoded by digest instead of verbatim.
const MAX_VERBATIM_UID_LEN: usize = 64;

/// Hex characters of SHA-256 used for a digest-encoded UID.
const UID_DIGEST_HEX: usize = 16;

/// Name tag for each object kind.
fn tag(kind: ObjectKind) -> &'static str {
    kind.into()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn hex_digest(raw: &str, hex_len: usize) -> String {
    Sha256::digest(raw.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(hex_len)
        .collect()
}

/// Replace every character outside `[A-Za-z0-9-]` with `-`.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_name_char(c) { c } else { '-' })
        .collect()
}

/// A sanitized free-form component, shortened deterministically when long.
fn component(raw: &str) -> String {
    let clean = sanitize(raw);
    if clean.len() <= MAX_COMPONENT_LEN {
        return clean;
    }
    let head: String = clean.chars().take(TRUNCATED_COMPONENT_LEN).collect();
    format!("{head}-{}", hex_digest(raw, 8))
}

/// Prefix-free owner segment for an exposure UID.
///
/// Verbatim UIDs encode as `u{len}-{uid}`; the length is terminated by
/// `-`, so no encoded UID is a prefix of another (`u3-abc` vs `u5-abc-d`).
/// UIDs that are empty, too long, or contain characters outside the name
/// alphabet encode as `h-{digest}` with a fixed-width digest, which keeps
/// the two forms disjoint.
pub fn owner_segment(uid: &str) -> String {
    let verbatim =
        !uid.is_empty() && uid.len() <= MAX_VERBATIM_UID_LEN && uid.chars().all(is_name_char);
    if verbatim {
        format!("u{}-{uid}", uid.len())
    } else {
        format!("h-{}", hex_digest(uid, UID_DIGEST_HEX))
    }
}

/// The prefix every `kind` object owned by `uid` starts with.
pub fn ownership_prefix(kind: ObjectKind, uid: &str) -> String {
    format!("{}-{}-", tag(kind), owner_segment(uid))
}

/// Whether `name` is a `kind` object owned by `uid`.
pub fn is_owned(kind: ObjectKind, uid: &str, name: &str) -> bool {
    name.starts_with(&ownership_prefix(kind, uid))
}

/// Port component: the port name, or the external port number when unnamed,
/// followed by the lower-cased protocol.
fn port_component(port: &PortSpec) -> String {
    let name = if port.name.is_empty() {
        port.external_port.to_string()
    } else {
        component(&port.name)
    };
    format!("{name}-{}", port.protocol.to_string().to_ascii_lowercase())
}

/// Pool (backend) for one port of an exposure.
pub fn pool_name(uid: &str, port: &PortSpec) -> String {
    format!(
        "{}{}",
        ownership_prefix(ObjectKind::Backend, uid),
        port_component(port)
    )
}

/// Pool member (server) for the `ordinal`-th node.
pub fn member_name(uid: &str, node: &str, worker_port: u16, ordinal: usize) -> String {
    format!(
        "{}{}-{worker_port}-{ordinal}",
        ownership_prefix(ObjectKind::Server, uid),
        component(node)
    )
}

/// Listener group (frontend) for one port of an exposure.
pub fn group_name(uid: &str, port: &PortSpec) -> String {
    format!(
        "{}{}",
        ownership_prefix(ObjectKind::Frontend, uid),
        port_component(port)
    )
}

/// Listener bind for the `ordinal`-th external address.
pub fn bind_name(uid: &str, external_port: u16, ordinal: usize) -> String {
    format!(
        "{}{external_port}-{ordinal}",
        ownership_prefix(ObjectKind::Bind, uid)
    )
}

/// Human-facing load balancer name for an exposure.
pub fn exposure_name(uid: &str) -> String {
    format!("haproxy-{uid}")
}
