//! `/ip route print detail`.

use serde::Serialize;

use super::fields::{LineClass, classify};

/// One route. `distance` and `scope` are empty strings when not printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub dst_address: String,
    pub gateway: String,
    pub distance: String,
    pub scope: String,
    pub target_scope: Option<String>,
}

/// Parse a route dump. Each route must fit on one line; lines without both
/// `dst-address` and `gateway` are skipped.
pub fn parse_routes(text: &str) -> Vec<RouteRecord> {
    text.lines()
        .filter_map(|line| match classify(line) {
            LineClass::Fields(fields) => Some(RouteRecord {
                dst_address: fields.non_empty("dst-address")?.to_string(),
                gateway: fields.non_empty("gateway")?.to_string(),
                distance: fields.get("distance").unwrap_or_default().to_string(),
                scope: fields.get("scope").unwrap_or_default().to_string(),
                target_scope: fields.non_empty("target-scope").map(str::to_string),
            }),
            LineClass::Boundary | LineClass::Other => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = "Flags: X - disabled, A - active, D - dynamic, C - connect, S - static
 0 ADS  dst-address=0.0.0.0/0 gateway=192.168.88.1 gateway-status=192.168.88.1 reachable via ether1 distance=1 scope=30 target-scope=10
 1 ADC  dst-address=192.168.88.0/24 pref-src=192.168.88.2 gateway=ether1 gateway-status=ether1 reachable distance=0 scope=10

 2  S   dst-address=10.99.0.0/16 distance=1
";

    #[test]
    fn test_parse_detail() {
        let routes = parse_routes(DETAIL);
        assert_eq!(routes.len(), 2);

        assert_eq!(routes[0].dst_address, "0.0.0.0/0");
        assert_eq!(routes[0].gateway, "192.168.88.1");
        assert_eq!(routes[0].distance, "1");
        assert_eq!(routes[0].scope, "30");
        assert_eq!(routes[0].target_scope.as_deref(), Some("10"));

        assert_eq!(routes[1].gateway, "ether1");
        assert_eq!(routes[1].target_scope, None);
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let routes = parse_routes("dst-address=10.0.0.0/8 gateway=10.1.1.1");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].distance, "");
        assert_eq!(routes[0].scope, "");
    }

    #[test]
    fn test_no_accumulation_across_lines() {
        let routes = parse_routes("dst-address=10.0.0.0/8\ngateway=10.1.1.1");
        assert!(routes.is_empty());
    }

    #[test]
    fn test_every_route_has_destination_and_gateway() {
        let text = "dst-address=1.0.0.0/8\ngateway=x\ndst-address= gateway=y\n# dst-address=2.0.0.0/8 gateway=z\ndst-address=3.0.0.0/8 gateway=w";
        let routes = parse_routes(text);
        assert_eq!(routes.len(), 1);
        assert!(
            routes
                .iter()
                .all(|r| !r.dst_address.is_empty() && !r.gateway.is_empty())
        );
    }
}
