//! Defaulting pass: fills in host addresses the source left out.

use tracing::debug;

use super::address::{IpGenerator, IpPool, MacGenerator};
use crate::dsl::{Host, Program, Statement};
use crate::error::Result;

/// Apply defaults using the standard [`IpPool`].
pub fn apply_defaults(program: Program) -> Result<Program> {
    apply_defaults_with(program, IpPool::default())
}

/// Apply defaults drawing generated IPs from `pool`.
///
/// Hosts are visited in declaration order. An IP is drawn only for hosts
/// without `ip`, a MAC only for hosts without `mac`; explicit values are
/// kept as written. Running out of either pool fails the whole pass.
pub fn apply_defaults_with(mut program: Program, pool: IpPool) -> Result<Program> {
    let mut ips = IpGenerator::new(pool);
    let mut macs = MacGenerator::new();

    for statement in &mut program.statements {
        match statement {
            Statement::Host(host) => fill_host(host, &mut ips, &mut macs)?,
            Statement::Controller(_)
            | Statement::RemoteController(_)
            | Statement::Switch(_)
            | Statement::Link(_)
            | Statement::Intent(_)
            | Statement::Up { .. }
            | Statement::Down { .. }
            | Statement::Ping(_) => {}
        }
    }

    Ok(program)
}

fn fill_host(host: &mut Host, ips: &mut IpGenerator, macs: &mut MacGenerator) -> Result<()> {
    if host.ip_addr.is_none() {
        let ip = ips.next_addr()?;
        debug!(host = %host.name, %ip, "assigned default IP");
        host.ip_addr = Some(ip.to_string());
    }
    if host.mac.is_none() {
        let mac = macs.next_addr()?;
        debug!(host = %host.name, %mac, "assigned default MAC");
        host.mac = Some(mac.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    fn addresses(program: &Program) -> Vec<(String, String)> {
        program
            .hosts()
            .map(|h| (h.ip_addr.clone().unwrap(), h.mac.clone().unwrap()))
            .collect()
    }

    #[test]
    fn test_hosts_get_sequential_addresses() {
        let program = parse(
            "host a image \"x\"\nswitch s1\nhost b image \"x\"\nhost c image \"x\"",
        )
        .unwrap();
        let program = apply_defaults(program).unwrap();
        assert_eq!(
            addresses(&program),
            vec![
                ("10.0.0.1".to_string(), "00:00:00:00:00:01".to_string()),
                ("10.0.0.2".to_string(), "00:00:00:00:00:02".to_string()),
                ("10.0.0.3".to_string(), "00:00:00:00:00:03".to_string()),
            ]
        );
    }

    #[test]
    fn test_explicit_values_survive_and_do_not_consume() {
        let program = parse(
            "host a ip \"10.9.9.9\" image \"x\" mac \"aa:bb:cc:dd:ee:ff\"\n\
             host b image \"x\" mac \"02:00:00:00:00:10\"\n\
             host c ip \"172.16.0.5\" image \"x\"",
        )
        .unwrap();
        let program = apply_defaults(program).unwrap();
        assert_eq!(
            addresses(&program),
            vec![
                ("10.9.9.9".to_string(), "aa:bb:cc:dd:ee:ff".to_string()),
                ("10.0.0.1".to_string(), "02:00:00:00:00:10".to_string()),
                ("172.16.0.5".to_string(), "00:00:00:00:00:01".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_host_statements_are_untouched() {
        let program = parse("controller c0\nswitch s1 s2\nlink l src s1 dst s2\nup\ndown").unwrap();
        let defaulted = apply_defaults(program.clone()).unwrap();
        assert_eq!(program, defaulted);
    }

    #[test]
    fn test_custom_pool() {
        let program = parse("host a image \"x\"").unwrap();
        let pool = "192.168.50.0/24".parse().unwrap();
        let program = apply_defaults_with(program, pool).unwrap();
        assert_eq!(program.hosts().next().unwrap().ip_addr.as_deref(), Some("192.168.50.1"));
    }

    #[test]
    fn test_pool_exhaustion_fails_the_pass() {
        let source = (0..4).map(|i| format!("host h{} image \"x\"\n", i)).collect::<String>();
        let program = parse(&source).unwrap();
        let pool = "10.1.0.0/30".parse().unwrap();
        let err = apply_defaults_with(program, pool).unwrap_err();
        assert!(matches!(
            err,
            crate::error::MidoriError::AddressPoolExhausted { pool: "IP", .. }
        ));
    }

    #[test]
    fn test_each_pass_starts_fresh() {
        let program = parse("host a image \"x\"").unwrap();
        let first = apply_defaults(program.clone()).unwrap();
        let second = apply_defaults(program).unwrap();
        assert_eq!(first, second);
    }
}
