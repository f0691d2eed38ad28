//! Row projection: snapshot lists to filtered, ordered display rows

use chrono::DateTime;
use dcli_engine::{Container, Image, Network, Stack, Volume};

/// Column headers of each list
pub const CONTAINER_COLUMNS: [&str; 6] = ["ID", "Container", "Image", "Port", "Size", "Status"];
pub const IMAGE_COLUMNS: [&str; 4] = ["ID", "Image", "Size", "Created"];
pub const NETWORK_COLUMNS: [&str; 5] = ["ID", "Name", "Driver", "IP Subnet", "IP Gateway"];
pub const VOLUME_COLUMNS: [&str; 5] = ["Name", "Stack", "Driver", "Mount point", "Created"];
pub const STACK_COLUMNS: [&str; 2] = ["Name", "Created"];

const GREEN_UP_ARROW: &str = "\x1b[32m↑\x1b[0m";
const RED_DOWN_ARROW: &str = "\x1b[31m↓\x1b[0m";

/// A display row
///
/// `key` identifies the entity in the snapshot (full id for containers,
/// images and networks, name for volumes and stacks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<String>,
}

fn matches(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

/// State cell with a colored arrow: up for running, down for anything else
pub fn state_glyph(state: &str) -> String {
    if state == "running" {
        format!("{} {}", GREEN_UP_ARROW, state)
    } else {
        format!("{} {}", RED_DOWN_ARROW, state)
    }
}

/// Container rows filtered by name or image and grouped by state.
///
/// The grouping is a stable sort on the raw state string in descending
/// order, which puts "running" ahead of "exited" but has no notion of
/// lifecycle priority for other states.
pub fn container_rows(containers: &[Container], filter: &str) -> Vec<Row> {
    let needle = filter.to_lowercase();
    let mut filtered: Vec<&Container> = containers
        .iter()
        .filter(|c| needle.is_empty() || matches(&c.name, &needle) || matches(&c.image, &needle))
        .collect();

    filtered.sort_by(|a, b| b.state.cmp(&a.state));

    filtered
        .into_iter()
        .map(|c| {
            let port = c
                .ports
                .first()
                .map(|p| format!("http://localhost:{}", p.public_port.unwrap_or(0)))
                .unwrap_or_default();

            Row {
                key: c.id.clone(),
                cells: vec![
                    c.id.clone(),
                    c.name.clone(),
                    c.image.clone(),
                    port,
                    c.size(),
                    state_glyph(&c.state),
                ],
            }
        })
        .collect()
}

/// Image rows filtered by repository tag; `now` is epoch seconds
pub fn image_rows(images: &[Image], filter: &str, now: i64) -> Vec<Row> {
    let needle = filter.to_lowercase();
    images
        .iter()
        .filter(|i| needle.is_empty() || matches(&i.repo_tag(), &needle))
        .map(|i| Row {
            key: i.id.clone(),
            cells: vec![
                i.short_id(),
                i.repo_tag(),
                i.formatted_size(),
                i.formatted_created(now),
            ],
        })
        .collect()
}

pub fn network_rows(networks: &[Network], filter: &str) -> Vec<Row> {
    let needle = filter.to_lowercase();
    networks
        .iter()
        .filter(|n| needle.is_empty() || matches(&n.name, &needle))
        .map(|n| Row {
            key: n.id.clone(),
            cells: vec![
                n.id.clone(),
                n.name.clone(),
                n.driver.clone(),
                n.subnet.clone(),
                n.gateway.clone(),
            ],
        })
        .collect()
}

pub fn volume_rows(volumes: &[Volume], filter: &str) -> Vec<Row> {
    let needle = filter.to_lowercase();
    volumes
        .iter()
        .filter(|v| needle.is_empty() || matches(&v.name, &needle))
        .map(|v| Row {
            key: v.name.clone(),
            cells: vec![
                v.name.clone(),
                String::new(),
                v.driver.clone(),
                v.mountpoint.clone(),
                v.created_at.clone(),
            ],
        })
        .collect()
}

pub fn stack_rows(stacks: &[Stack], filter: &str) -> Vec<Row> {
    let needle = filter.to_lowercase();
    stacks
        .iter()
        .filter(|s| needle.is_empty() || matches(s.name(), &needle))
        .map(|s| Row {
            key: s.name().to_string(),
            cells: vec![s.name().to_string(), format_created(&s.network.created)],
        })
        .collect()
}

/// RFC 3339 creation time as "YYYY-MM-DD HH:MM:SS", raw text if unparseable
fn format_created(created: &str) -> String {
    DateTime::parse_from_rfc3339(created)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| created.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use dcli_engine::PortMapping;

    fn two_containers() -> Vec<Container> {
        vec![
            mock_container("abc", "db", "mysql", "exited"),
            mock_container("1234567890", "nginx", "nginx:latest", "running"),
        ]
    }

    // ==================== Containers ====================

    #[test]
    fn test_container_filter_scenario() {
        let rows = container_rows(&two_containers(), "ngin");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "1234567890");
        assert_eq!(rows[0].cells[0], "1234567890");
        assert_eq!(rows[0].cells[1], "nginx");
        assert_eq!(rows[0].cells[2], "nginx:latest");
        assert!(rows[0].cells[5].starts_with("\x1b[32m↑"));
        assert!(rows[0].cells[5].ends_with(" running"));
    }

    #[test]
    fn test_container_filter_is_case_insensitive_on_name_and_image() {
        let containers = two_containers();
        assert_eq!(container_rows(&containers, "NGINX").len(), 1);
        assert_eq!(container_rows(&containers, "MySQL")[0].cells[1], "db");
        assert!(container_rows(&containers, "postgres").is_empty());
    }

    #[test]
    fn test_container_empty_filter_returns_all_running_first() {
        let rows = container_rows(&two_containers(), "");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells[1], "nginx");
        assert_eq!(rows[1].cells[1], "db");
        assert!(rows[1].cells[5].starts_with("\x1b[31m↓"));
        assert!(rows[1].cells[5].ends_with(" exited"));
    }

    #[test]
    fn test_container_sort_is_lexicographic_and_stable() {
        let containers = vec![
            mock_container("1", "a", "img", "exited"),
            mock_container("2", "b", "img", "paused"),
            mock_container("3", "c", "img", "running"),
            mock_container("4", "d", "img", "exited"),
            mock_container("5", "e", "img", "restarting"),
        ];
        let names: Vec<String> = container_rows(&containers, "")
            .into_iter()
            .map(|r| r.cells[1].clone())
            .collect();
        assert_eq!(names, vec!["c", "e", "b", "a", "d"]);
    }

    #[test]
    fn test_container_port_and_size_cells() {
        let mut container = mock_container("1", "web", "nginx", "running");
        container.size_root_fs = 1024 * 1024;
        container.ports = vec![
            PortMapping {
                private_port: 80,
                public_port: Some(8080),
                protocol: "tcp".into(),
                ..Default::default()
            },
            PortMapping {
                private_port: 443,
                public_port: Some(8443),
                protocol: "tcp".into(),
                ..Default::default()
            },
        ];
        let rows = container_rows(&[container], "");
        assert_eq!(rows[0].cells[3], "http://localhost:8080");
        assert_eq!(rows[0].cells[4], "1.00 MB");
    }

    #[test]
    fn test_container_without_ports_has_empty_port_cell() {
        let rows = container_rows(&two_containers(), "db");
        assert_eq!(rows[0].cells[3], "");
    }

    // ==================== Images ====================

    #[test]
    fn test_image_rows() {
        let now = 1_700_000_000 + 3 * 24 * 3600;
        let mut dangling = mock_image("cccccccccccccccccc", "");
        dangling.repo_tags.clear();
        let images = vec![mock_image("aaaaaaaaaaaaaaaaaa", "nginx:latest"), dangling];

        let rows = image_rows(&images, "", now);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "aaaaaaaaaaaaaaaaaa");
        assert_eq!(
            rows[0].cells,
            vec!["aaaaaaaaaa", "nginx:latest", "187.00 MB", "3 days ago"]
        );
        assert_eq!(rows[1].cells[1], "<none>");
    }

    #[test]
    fn test_image_filter_by_tag() {
        let images = vec![
            mock_image("aaaaaaaaaaaaaaaaaa", "nginx:latest"),
            mock_image("bbbbbbbbbbbbbbbbbb", "redis:7"),
        ];
        let rows = image_rows(&images, "REDIS", 1_700_000_000);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[1], "redis:7");
    }

    // ==================== Networks / Volumes / Stacks ====================

    #[test]
    fn test_network_rows() {
        let networks = vec![mock_network("n1", "bridge"), mock_network("n2", "backend")];
        let rows = network_rows(&networks, "back");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].cells,
            vec!["n2", "backend", "bridge", "172.18.0.0/16", "172.18.0.1"]
        );
    }

    #[test]
    fn test_volume_rows() {
        let volumes = vec![mock_volume("pgdata"), mock_volume("site")];
        let rows = volume_rows(&volumes, "");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "pgdata");
        assert_eq!(rows[0].cells[1], "");
        assert_eq!(rows[0].cells[2], "local");
        assert_eq!(rows[0].cells[4], "2024-03-01T10:20:30Z");
        assert_eq!(volume_rows(&volumes, "SITE").len(), 1);
    }

    #[test]
    fn test_stack_rows_format_created() {
        let stacks = vec![
            Stack {
                network: mock_stack_network("n2", "shop_default", "shop"),
            },
            Stack {
                network: mock_stack_network("n3", "blog_default", "blog"),
            },
        ];
        let rows = stack_rows(&stacks, "shop");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, vec!["shop_default", "2024-03-01 10:20:30"]);
    }

    #[test]
    fn test_format_created_falls_back_to_raw() {
        assert_eq!(format_created("yesterday"), "yesterday");
    }
}
