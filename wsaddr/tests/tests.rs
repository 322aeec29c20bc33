use std::cell::Cell;
use std::net::{Ipv4Addr, SocketAddrV4};

use rand::Rng;
use wsaddr::*;

#[derive(Default)]
struct FakeEnv {
    vars:       Vec<(&'static str, &'static [u8])>,
    cwd:        Option<&'static [u8]>,
    cwd_reads:  Cell<usize>,
}

impl FakeEnv {
    fn with_var(mut self, key: &'static str, val: &'static [u8]) -> Self {
        self.vars.push((key, val));
        self
    }

    fn in_dir(mut self, cwd: &'static [u8]) -> Self {
        self.cwd = Some(cwd);
        self
    }

    fn detect(&self) -> Detection {
        detect(&Toggles::read(self), self)
    }
}

impl IdentitySource for FakeEnv {
    fn var(&self, key: &str) -> Option<Vec<u8>> {
        self.vars
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_vec())
    }

    fn current_dir(&self) -> Option<Vec<u8>> {
        self.cwd_reads.set(self.cwd_reads.get() + 1);
        self.cwd.map(<[u8]>::to_vec)
    }
}

fn ws(n: u32) -> WorkspaceContext {
    WorkspaceContext::active(address_for_number(n))
}

fn v4(a: [u8; 4], port: u16) -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::from(a), port)
}

#[test]
fn every_workspace_number_maps_to_its_octets() {
    for n in 0..=u16::MAX as u32 {
        assert_eq!(
            address_for_number(n),
            Ipv4Addr::new(127, 18, (n >> 8) as u8, (n & 255) as u8)
        );
    }
}

#[test]
fn only_low_sixteen_bits_matter() {
    assert_eq!(address_for_number(65536 + 5), Ipv4Addr::new(127, 18, 0, 5));
    assert_eq!(workspace_number(b"workspace-70000"), 70000);
    assert_eq!(workspace_ip_from_name(b"workspace-70000"), Some(Ipv4Addr::new(127, 18, 17, 112)));
}

#[test]
fn trailing_digits() {
    assert_eq!(parse_trailing_number(b"workspace-1"), Some(1));
    assert_eq!(parse_trailing_number(b"42"), Some(42));
    assert_eq!(parse_trailing_number(b"ws-007"), Some(7));
    assert_eq!(parse_trailing_number(b"4294967295"), Some(u32::MAX));
    assert_eq!(parse_trailing_number(b"workspace-c"), None);
    assert_eq!(parse_trailing_number(b"workspace-1a"), None);
    assert_eq!(parse_trailing_number(b""), None);
    assert_eq!(parse_trailing_number(b"workspace-4294967296"), None);
}

#[test]
fn fnv_reference_values() {
    // FNV-1a("a") = 0xE40C292C.
    assert_eq!(fnv1a16_lower(b"a"), 0x292C);
    assert_eq!(fnv1a16_lower(b"workspace-c"), 45894);
    assert_eq!(workspace_ip_from_name(b"workspace-c"), Some(Ipv4Addr::new(127, 18, 179, 70)));
    assert_eq!(workspace_ip_from_name(b"my-project"), Some(Ipv4Addr::new(127, 18, 106, 11)));
}

#[test]
fn overflowing_digits_hash_the_whole_name() {
    assert_eq!(workspace_number(b"workspace-99999999999"), 40262);
    assert_eq!(
        workspace_ip_from_name(b"workspace-99999999999"),
        Some(Ipv4Addr::new(127, 18, 157, 70))
    );
}

#[test]
fn names_hash_case_insensitively() {
    let mut rng = rand::thread_rng();
    for _ in 0..500 {
        let len = rng.gen_range(1..16);
        let lower: Vec<u8> = (0..len)
            .map(|_| if rng.gen_bool(0.1) { b'-' } else { rng.gen_range(b'a'..=b'z') })
            .collect();
        let mixed: Vec<u8> = lower
            .iter()
            .map(|b| if rng.gen_bool(0.5) { b.to_ascii_uppercase() } else { *b })
            .collect();
        assert_eq!(workspace_ip_from_name(&lower), workspace_ip_from_name(&mixed));
    }
}

#[test]
fn paths_and_names_agree() {
    let one = Some(Ipv4Addr::new(127, 18, 0, 1));
    assert_eq!(workspace_ip_from_name(b"/root/workspace-1"), one);
    assert_eq!(workspace_ip_from_name(b"workspace-1"), one);
    assert_eq!(workspace_ip_from_name(b"foo/"), None);
    assert_eq!(address_of(b""), Err(IdentityError::EmptyName(String::new())));
}

#[test]
fn disable_wins_over_everything() {
    let env = FakeEnv::default()
        .with_var(DISABLE_VAR, b"1")
        .with_var(OVERRIDE_VAR, b"workspace-3")
        .in_dir(b"/root/workspace-4");
    let d = env.detect();
    assert_eq!(d.context, WorkspaceContext::INACTIVE);
    assert_eq!(d.source, DetectionSource::Disabled);
    assert_eq!(env.cwd_reads.get(), 0);
}

#[test]
fn disable_needs_exactly_one() {
    let env = FakeEnv::default()
        .with_var(DISABLE_VAR, b"10")
        .with_var(OVERRIDE_VAR, b"workspace-3");
    assert_eq!(env.detect().context.address(), Some(Ipv4Addr::new(127, 18, 0, 3)));
}

#[test]
fn override_takes_last_component_and_skips_cwd() {
    let env = FakeEnv::default()
        .with_var(OVERRIDE_VAR, b"/root/workspace-7")
        .in_dir(b"/root/workspace-4");
    let d = env.detect();
    assert_eq!(d.context.address(), Some(Ipv4Addr::new(127, 18, 0, 7)));
    assert_eq!(d.source, DetectionSource::Override);
    assert_eq!(env.cwd_reads.get(), 0);
}

#[test]
fn override_needs_no_prefix() {
    let env = FakeEnv::default().with_var(OVERRIDE_VAR, b"My-Project");
    assert_eq!(env.detect().context.address(), workspace_ip_from_name(b"my-project"));
}

#[test]
fn empty_override_falls_back_to_cwd() {
    let env = FakeEnv::default()
        .with_var(OVERRIDE_VAR, b"")
        .in_dir(b"/root/workspace-300");
    let d = env.detect();
    assert_eq!(d.context.address(), Some(Ipv4Addr::new(127, 18, 1, 44)));
    assert_eq!(d.source, DetectionSource::WorkingDirectory);
}

#[test]
fn override_with_trailing_slash_is_inactive() {
    let env = FakeEnv::default()
        .with_var(OVERRIDE_VAR, b"/root/workspace-2/")
        .in_dir(b"/root/workspace-4");
    let d = env.detect();
    assert!(!d.context.is_active());
    assert_eq!(d.source, DetectionSource::EmptyName);
}

#[test]
fn cwd_detection() {
    let d = FakeEnv::default().in_dir(b"/tmp/x/workspace-c").detect();
    assert_eq!(d.context.address(), Some(Ipv4Addr::new(127, 18, 179, 70)));

    let d = FakeEnv::default().in_dir(b"/root/project").detect();
    assert_eq!(d.source, DetectionSource::NotAWorkspace);
    assert!(!d.context.is_active());

    let d = FakeEnv::default().in_dir(b"/root/workspace-").detect();
    assert_eq!(d.source, DetectionSource::EmptyName);

    let d = FakeEnv::default().in_dir(b"/").detect();
    assert!(!d.context.is_active());

    let d = FakeEnv::default().detect();
    assert_eq!(d.source, DetectionSource::NotAWorkspace);
}

#[test]
fn diagnostics_toggle() {
    assert!(!Toggles::read(&FakeEnv::default()).diagnostics);
    assert!(!Toggles::read(&FakeEnv::default().with_var(DIAGNOSTICS_VAR, b"")).diagnostics);
    assert!(Toggles::read(&FakeEnv::default().with_var(DIAGNOSTICS_VAR, b"yes")).diagnostics);
}

#[test]
fn inactive_context_has_no_address() {
    assert_eq!(ws(300).address(), Some(Ipv4Addr::new(127, 18, 1, 44)));
    assert!(!WorkspaceContext::INACTIVE.is_active());
    assert_eq!(WorkspaceContext::INACTIVE.address(), None);
}

#[test]
fn bind_redirects_wildcard_and_loopback() {
    let ctx = ws(1);
    assert_eq!(rewrite(Call::Bind, &ctx, v4([0, 0, 0, 0], 3000)), Some(v4([127, 18, 0, 1], 3000)));
    assert_eq!(rewrite(Call::Bind, &ctx, v4([127, 0, 0, 1], 0)), Some(v4([127, 18, 0, 1], 0)));
    assert_eq!(rewrite(Call::Bind, &ctx, v4([127, 0, 0, 2], 3000)), None);
    assert_eq!(rewrite(Call::Bind, &ctx, v4([10, 0, 0, 5], 3000)), None);
}

#[test]
fn connect_redirects_only_loopback() {
    let ctx = ws(300);
    assert_eq!(rewrite(Call::Connect, &ctx, v4([127, 0, 0, 1], 9000)), Some(v4([127, 18, 1, 44], 9000)));
    assert_eq!(rewrite(Call::Connect, &ctx, v4([0, 0, 0, 0], 9000)), None);
    assert_eq!(rewrite(Call::Connect, &ctx, v4([192, 168, 1, 1], 9000)), None);
}

#[test]
fn inactive_context_never_rewrites() {
    let ctx = WorkspaceContext::INACTIVE;
    for call in [Call::Bind, Call::Connect] {
        assert_eq!(rewrite(call, &ctx, v4([127, 0, 0, 1], 80)), None);
        assert_eq!(rewrite(call, &ctx, v4([0, 0, 0, 0], 80)), None);
    }
    assert_eq!(resolve(&ctx, Some(b"localhost"), Some(b"80")), Resolution::Passthrough);
}

#[test]
fn local_hosts_resolve_to_workspace() {
    let ctx = ws(1);
    assert_eq!(
        resolve(&ctx, Some(b"localhost"), Some(b"8080")),
        Resolution::Local(v4([127, 18, 0, 1], 8080))
    );
    assert_eq!(resolve(&ctx, Some(b""), None), Resolution::Local(v4([127, 18, 0, 1], 0)));
    assert_eq!(
        resolve(&ctx, Some(b"127.0.0.1"), Some(b"http")),
        Resolution::Local(v4([127, 18, 0, 1], 0))
    );
}

#[test]
fn other_hosts_pass_through() {
    let ctx = ws(1);
    assert_eq!(resolve(&ctx, Some(b"example.com"), Some(b"443")), Resolution::Passthrough);
    assert_eq!(resolve(&ctx, Some(b"LOCALHOST"), None), Resolution::Passthrough);
    assert_eq!(resolve(&ctx, Some(b"127.0.0.2"), None), Resolution::Passthrough);
    assert_eq!(resolve(&ctx, None, Some(b"80")), Resolution::Passthrough);
}

#[test]
fn service_ports() {
    assert_eq!(parse_service_port(b"8080"), Some(8080));
    assert_eq!(parse_service_port(b"65535"), Some(65535));
    assert_eq!(parse_service_port(b"0"), None);
    assert_eq!(parse_service_port(b"65536"), None);
    assert_eq!(parse_service_port(b"80x"), None);
    assert_eq!(parse_service_port(b"-1"), None);
    assert_eq!(parse_service_port(b""), None);
}

#[test]
fn service_port_allows_leading_blanks() {
    assert_eq!(parse_service_port(b" 80"), Some(80));
    assert_eq!(parse_service_port(b"\t\n 443"), Some(443));
    assert_eq!(parse_service_port(b"\x0b8080"), Some(8080));
    assert_eq!(parse_service_port(b"+80"), Some(80));
    assert_eq!(parse_service_port(b" +80"), Some(80));
    assert_eq!(parse_service_port(b"80 "), None);
    assert_eq!(parse_service_port(b"   "), None);
    assert_eq!(parse_service_port(b"+ 80"), None);
}
