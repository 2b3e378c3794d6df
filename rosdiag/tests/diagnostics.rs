//! End-to-end diagnostics against an in-memory RouterOS stand-in.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use rosdiag::diagnostics::{
    BGP_PEERS, FIREWALL_FILTER_COUNT, FIREWALL_NAT_COUNT, INTERFACE_STATS, OSPF_NEIGHBORS, ROUTES,
    SYSTEM_RESOURCE, SYSTEM_ROUTERBOARD,
};
use rosdiag::error::{CommandError, TransportError};
use rosdiag::session::{ERROR_MARKER, IDENTITY_COMMAND};
use rosdiag::{
    CategorySet, Connector, DeviceTarget, RemoteSession, Result, run_diagnostics,
    run_diagnostics_on_routers, test_connection,
};

const RESOURCE: &str = "\
                   uptime: 3w2d4h11m
                  version: 7.14.2 (stable)
               build-time: Mar/27/2024 11:48:15
                 cpu-load: 4%
              free-memory: 812.4MiB
             total-memory: 1024.0MiB
                      cpu: ARM64
        architecture-name: arm64
";

const ROUTERBOARD: &str = "\
       routerboard: yes
        board-name: RB5009UG+S+
             model: RB5009UG+S+
";

const INTERFACES: &str = "\
Flags: R - RUNNING; S - SLAVE
Columns: NAME, RX-BYTE, TX-BYTE
 0  R  name=\"ether1\" type=\"ether\" running=true disabled=false
       rx-byte=123456 tx-byte=654321 rx-packet=1000 tx-packet=900

 1     name=\"ether2\" type=\"ether\" running=false disabled=true
";

const ROUTE_TABLE: &str = "\
Flags: D - DYNAMIC; A - ACTIVE; c - CONNECT, s - STATIC
 0  As dst-address=0.0.0.0/0 gateway=192.0.2.1 distance=1 scope=30 target-scope=10
 1  DAc dst-address=192.0.2.0/24 gateway=ether1 distance=0 scope=10
";

const OSPF: &str = "\
Flags: V - VIRTUAL; D - DYNAMIC
 0  D instance=default router-id=10.255.0.2 address=192.0.2.2
      state=\"Full\" priority=1
";

/// Command outputs shared by every session of a [`ScriptedConnector`].
/// A command missing from the script fails like an unknown RouterOS path.
#[derive(Default)]
struct Script {
    outputs: HashMap<&'static str, &'static str>,
}

impl Script {
    fn healthy_router() -> Self {
        let mut outputs = HashMap::new();
        outputs.insert(SYSTEM_RESOURCE, RESOURCE);
        outputs.insert(SYSTEM_ROUTERBOARD, ROUTERBOARD);
        outputs.insert(INTERFACE_STATS, INTERFACES);
        outputs.insert(ROUTES, ROUTE_TABLE);
        outputs.insert(FIREWALL_FILTER_COUNT, "17\n");
        outputs.insert(FIREWALL_NAT_COUNT, "3\n");
        outputs.insert(OSPF_NEIGHBORS, OSPF);
        outputs.insert(IDENTITY_COMMAND, "  name: edge-1\n");
        Self { outputs }
    }

    fn without(mut self, command: &str) -> Self {
        self.outputs.remove(command);
        self
    }
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

struct ScriptedConnector {
    script: Arc<Script>,
    unreachable: HashSet<String>,
    counters: Arc<Counters>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            unreachable: HashSet::new(),
            counters: Arc::new(Counters::default()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn unreachable(mut self, host: &str) -> Self {
        self.unreachable.insert(host.to_string());
        self
    }

    fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

struct ScriptedSession {
    script: Arc<Script>,
    counters: Arc<Counters>,
    sent: Arc<Mutex<Vec<String>>>,
    closed: bool,
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    async fn open(&self, target: &DeviceTarget) -> Result<ScriptedSession> {
        if self.unreachable.contains(&target.host) {
            return Err(TransportError::Timeout {
                host: target.host.clone(),
                port: target.port,
                timeout: Duration::from_secs(10),
            }
            .into());
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedSession {
            script: self.script.clone(),
            counters: self.counters.clone(),
            sent: self.sent.clone(),
            closed: false,
        })
    }
}

impl RemoteSession for ScriptedSession {
    async fn run(&mut self, command: &str) -> Result<String> {
        if self.closed {
            return Err(CommandError::NotConnected.into());
        }
        self.sent.lock().unwrap().push(command.to_string());
        match self.script.outputs.get(command) {
            Some(output) => Ok(output.to_string()),
            None => Err(CommandError::Failed {
                command: command.to_string(),
                message: "bad command name".to_string(),
            }
            .into()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

fn target(name: &str, host: &str) -> Arc<DeviceTarget> {
    Arc::new(DeviceTarget::new(name, host, 22, "admin", "example"))
}

#[tokio::test]
async fn test_full_run_parses_every_section() {
    let connector = ScriptedConnector::new(Script::healthy_router());

    let report = run_diagnostics(&connector, target("edge-1", "192.0.2.10"), &CategorySet::all()).await;

    assert!(report.connected);
    assert!(report.error.is_none());

    let system = report.system.as_ref().unwrap();
    assert_eq!(system.version, "7.14.2 (stable)");
    assert_eq!(system.cpu_load, "4%");
    assert_eq!(system.board_name, "RB5009UG+S+");

    let interfaces = report.interfaces.as_ref().unwrap();
    assert_eq!(interfaces.len(), 2);
    assert!(interfaces[0].running);
    assert_eq!(interfaces[0].rx_bytes.as_deref(), Some("123456"));
    assert!(interfaces[1].disabled);

    let routes = report.routes.as_ref().unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].gateway, "192.0.2.1");
    assert_eq!(routes[0].target_scope.as_deref(), Some("10"));

    let firewall = report.firewall.as_ref().unwrap();
    assert_eq!(firewall.filter_rules, 17);
    assert_eq!(firewall.nat_rules, 3);

    // BGP is not scripted: the probe fails and the section is empty.
    assert_eq!(report.bgp_peers.as_ref().map(Vec::len), Some(0));
    let neighbors = report.ospf_neighbors.as_ref().unwrap();
    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].state, "Full");

    assert_eq!(connector.closed(), 1);
}

#[tokio::test]
async fn test_missing_ospf_is_not_an_error() {
    let connector = ScriptedConnector::new(Script::healthy_router().without(OSPF_NEIGHBORS));
    let categories: CategorySet = "routing".parse().unwrap();

    let report = run_diagnostics(&connector, target("edge-1", "192.0.2.10"), &categories).await;

    assert!(!report.has_failure());
    assert_eq!(report.ospf_neighbors.as_ref().map(Vec::len), Some(0));
    assert!(report.system.is_none());
    assert!(report.interfaces.is_none());
}

#[tokio::test]
async fn test_required_command_failure_discards_sections() {
    let connector = ScriptedConnector::new(Script::healthy_router().without(INTERFACE_STATS));

    let report = run_diagnostics(&connector, target("edge-1", "192.0.2.10"), &CategorySet::all()).await;

    assert!(report.connected);
    let error = report.error.as_deref().unwrap();
    assert!(error.contains(INTERFACE_STATS), "unexpected error: {error}");
    assert!(report.system.is_none());
    assert!(report.routes.is_none());

    // Routing never ran once interfaces failed.
    assert!(!connector.sent().iter().any(|c| c == ROUTES));
    assert_eq!(connector.closed(), 1);
}

#[tokio::test]
async fn test_categories_run_in_request_order() {
    let connector = ScriptedConnector::new(Script::healthy_router());
    let categories: CategorySet = "interfaces,system,interfaces".parse().unwrap();

    run_diagnostics(&connector, target("edge-1", "192.0.2.10"), &categories).await;

    assert_eq!(
        connector.sent(),
        vec![INTERFACE_STATS, SYSTEM_RESOURCE, SYSTEM_ROUTERBOARD]
    );
}

#[tokio::test]
async fn test_unreachable_router_is_not_closed() {
    let connector = ScriptedConnector::new(Script::healthy_router()).unreachable("192.0.2.99");

    let report = run_diagnostics(&connector, target("gone", "192.0.2.99"), &CategorySet::all()).await;

    assert!(!report.connected);
    assert!(report.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(connector.opened(), 0);
    assert_eq!(connector.closed(), 0);
}

#[tokio::test]
async fn test_fleet_isolates_failures_and_keeps_order() {
    let connector = Arc::new(
        ScriptedConnector::new(Script::healthy_router()).unreachable("192.0.2.2"),
    );
    let targets = vec![
        target("WISP - A", "192.0.2.1"),
        target("WISP - B", "192.0.2.2"),
        target("WISP - C", "192.0.2.3"),
    ];

    let reports =
        run_diagnostics_on_routers(connector.clone(), &targets, &CategorySet::all()).await;

    let names: Vec<_> = reports.iter().map(|r| r.target.name.as_str()).collect();
    assert_eq!(names, vec!["WISP - A", "WISP - B", "WISP - C"]);

    assert!(reports[0].connected && reports[0].error.is_none());
    assert!(!reports[1].connected);
    assert!(reports[2].connected && reports[2].error.is_none());

    assert_eq!(connector.opened(), 2);
    assert_eq!(connector.closed(), 2);

    let standalone = run_diagnostics(
        &ScriptedConnector::new(Script::healthy_router()),
        target("WISP - A", "192.0.2.1"),
        &CategorySet::all(),
    )
    .await;
    assert!(standalone.system.is_some());
    assert!(standalone.interfaces.as_ref().is_some_and(|i| !i.is_empty()));
    assert!(standalone.routes.as_ref().is_some_and(|r| !r.is_empty()));

    for report in [&reports[0], &reports[2]] {
        assert_eq!(report.system, standalone.system);
        assert_eq!(report.interfaces, standalone.interfaces);
        assert_eq!(report.routes, standalone.routes);
        assert_eq!(report.firewall, standalone.firewall);
        assert_eq!(report.bgp_peers, standalone.bgp_peers);
        assert_eq!(report.ospf_neighbors, standalone.ospf_neighbors);
    }
    assert!(reports[1].system.is_none());
}

#[tokio::test]
async fn test_empty_fleet() {
    let connector = Arc::new(ScriptedConnector::new(Script::default()));
    let reports = run_diagnostics_on_routers(connector, &[], &CategorySet::all()).await;
    assert!(reports.is_empty());
}

#[tokio::test]
async fn test_run_all_records_errors_in_place() {
    let connector = ScriptedConnector::new(Script::healthy_router());
    let edge = target("edge-1", "192.0.2.10");
    let mut session = assert_ok!(connector.open(&edge).await);

    let outputs = session
        .run_all(&[FIREWALL_NAT_COUNT, "/bogus print", FIREWALL_FILTER_COUNT])
        .await;

    let keys: Vec<_> = outputs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec![FIREWALL_NAT_COUNT, "/bogus print", FIREWALL_FILTER_COUNT]);
    assert_eq!(outputs[FIREWALL_NAT_COUNT], "3\n");
    assert!(outputs["/bogus print"].starts_with(ERROR_MARKER));
    assert_eq!(outputs[FIREWALL_FILTER_COUNT], "17\n");

    assert_ok!(session.close().await);
    assert_ok!(session.close().await);
    assert_eq!(connector.closed(), 1);
    assert_err!(session.run(IDENTITY_COMMAND).await);
}

#[tokio::test]
async fn test_connection_check() {
    let connector = ScriptedConnector::new(Script::healthy_router()).unreachable("192.0.2.99");

    let identity = assert_ok!(test_connection(&connector, &target("edge-1", "192.0.2.10")).await);
    assert!(identity.contains("edge-1"));
    assert_eq!(connector.closed(), 1);

    assert_err!(test_connection(&connector, &target("gone", "192.0.2.99")).await);
}
