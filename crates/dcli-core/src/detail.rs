//! Detail renderer: one markdown document per entity
//!
//! Every function here is pure and works on already fetched data. The
//! output is markdown made of headings, `---` rules and pipe tables; the
//! TUI turns it into styled terminal text.

use dcli_engine::format::{docker_hub_url, format_size, format_timestamp};
use dcli_engine::{Container, ContainerStats, Image, Network, Stack, Volume};
use std::collections::HashMap;

const SEPARATOR: &str = "\n\n---\n\n";

/// Markdown table with a heading.
///
/// The separator row always has two cells, plus a third when there are
/// more than two columns.
pub fn create_table(title: &str, columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = format!("# {}\n\n", title);

    for column in columns {
        table.push_str("| ");
        table.push_str(column);
        table.push(' ');
    }
    table.push_str("|\n");

    table.push_str("| ------------- | ------------- ");
    if columns.len() > 2 {
        table.push_str("| -------------");
    }
    table.push_str("|\n");

    for row in rows {
        for cell in row {
            table.push_str("| ");
            table.push_str(cell);
            table.push(' ');
        }
        table.push_str("|\n");
    }

    table
}

fn pair(key: &str, value: impl Into<String>) -> Vec<String> {
    vec![key.to_string(), value.into()]
}

/// Pipes inside a cell would split it into two columns
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn hub_section(image: &str) -> String {
    format!("# Docker hub image url \n {}", docker_hub_url(image))
}

fn format_labels(labels: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = labels.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    pairs.sort();
    escape_cell(&pairs.join(", "))
}

pub fn container_detail(container: &Container) -> String {
    let mut out = create_table(
        "# Container status",
        &["Type", "Value"],
        &[
            pair("ID", container.id.as_str()),
            pair("Name", container.name.as_str()),
            pair("Image", container.image.as_str()),
            pair("Status", container.state.as_str()),
            pair("Created", container.status.as_str()),
        ],
    );

    out.push_str(SEPARATOR);

    let ports: String = container
        .ports
        .iter()
        .map(|p| {
            format!(
                "{}:{}->{}/{} ",
                p.ip,
                p.public_port.unwrap_or(0),
                p.private_port,
                p.protocol
            )
        })
        .collect();
    let mut rows = vec![pair("Ports", ports), pair("Command", escape_cell(&container.command))];
    rows.extend(container.env.iter().map(|env| pair("ENV", escape_cell(env))));
    out.push_str(&create_table("# Container detail", &["Type", "Value"], &rows));

    out.push_str(SEPARATOR);
    out.push_str(&create_table(
        "# Networking",
        &["Network", "IP Address", "Gateway"],
        &[vec![
            container.network.name.clone(),
            container.network.ip_address.clone(),
            container.network.gateway.clone(),
        ]],
    ));

    out.push_str(SEPARATOR);
    out.push_str(&hub_section(&container.image));
    out
}

/// Image document; `now` (epoch seconds) anchors the relative ages
pub fn image_detail(image: &Image, now: i64) -> String {
    let build = &image.build;
    let name = image
        .repo_tags
        .first()
        .cloned()
        .unwrap_or_else(|| "<none>".to_string());

    let mut out = create_table(
        "# Image detail",
        &["Type", "Value"],
        &[
            pair("ID", image.short_id()),
            pair("Name", name.as_str()),
            pair("Size", image.formatted_size()),
            pair("Created", image.formatted_created(now)),
            pair(
                "Build",
                format!(
                    "{} - {} - Docker version {}",
                    build.os, build.architecture, build.docker_version
                ),
            ),
        ],
    );

    out.push_str(&create_table(
        "# Dockerfile details",
        &["Type", "Value"],
        &[
            pair("Author", build.author.as_str()),
            pair("CMD", escape_cell(&build.cmd.join(" "))),
            pair("Ports", build.exposed_ports.join(", ")),
            pair("Envs", escape_cell(&build.env.join(", "))),
        ],
    ));

    if !image.history.is_empty() {
        let rows: Vec<Vec<String>> = image
            .history
            .iter()
            .map(|layer| {
                vec![
                    if layer.created == 0 {
                        String::new()
                    } else {
                        format_timestamp(layer.created, now)
                    },
                    escape_cell(layer.created_by.trim()),
                    format_size(layer.size),
                    escape_cell(&layer.comment),
                ]
            })
            .collect();
        out.push_str(SEPARATOR);
        out.push_str(&create_table(
            "# Layers",
            &["Created", "Created by", "Size", "Comment"],
            &rows,
        ));
    }

    if let Some(tag) = image.repo_tags.first() {
        out.push_str(SEPARATOR);
        out.push_str(&hub_section(tag));
    }
    out
}

pub fn network_detail(network: &Network) -> String {
    let mut out = create_table(
        "# Network status",
        &["Type", "Value"],
        &[
            pair("ID", network.id.as_str()),
            pair("Name", network.name.as_str()),
            pair("Driver", network.driver.as_str()),
            pair("Attachable", network.attachable.to_string()),
            pair("Subnet", network.subnet.as_str()),
            pair("Gateway", network.gateway.as_str()),
        ],
    );

    if !network.containers.is_empty() {
        let rows: Vec<Vec<String>> = network
            .containers
            .iter()
            .map(|m| vec![m.name.clone(), m.ip_address.clone()])
            .collect();
        out.push_str("\n\n");
        out.push_str(&create_table("# Containers", &["Name", "IP Address"], &rows));
    }
    out
}

pub fn volume_detail(volume: &Volume) -> String {
    let mut out = create_table(
        "# Volume detail",
        &["Type", "Value"],
        &[
            pair("ID", volume.name.as_str()),
            pair("Created", volume.created_at.as_str()),
            pair("Mount path", volume.mountpoint.as_str()),
            pair("Driver", volume.driver.as_str()),
            pair("Labels", format_labels(&volume.labels)),
        ],
    );

    out.push_str("\n\n");

    if !volume.containers.is_empty() {
        let rows: Vec<Vec<String>> = volume
            .containers
            .iter()
            .map(|c| vec![c.name.clone(), c.mounted_at.clone(), c.read_only.to_string()])
            .collect();
        out.push_str(&create_table(
            "# Containers using this volume",
            &["Name", "Mounted at", "Read -only"],
            &rows,
        ));
    }
    out
}

pub fn stack_detail(stack: &Stack) -> String {
    let mut out = format!("\n # Stack detail {}\n\n", stack.name());

    if !stack.containers().is_empty() {
        let rows: Vec<Vec<String>> = stack
            .containers()
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.state.clone(),
                    c.image.clone(),
                    c.ip_address.clone(),
                ]
            })
            .collect();
        out.push_str(&create_table(
            "# Containers",
            &["Name", "Status", "Image", "IP"],
            &rows,
        ));
    }
    out
}

pub fn stats_detail(stats: &ContainerStats) -> String {
    create_table(
        "# Stats",
        &["CPU", "MEM USAGE/LIMIT", "MEM", "PIDS"],
        &[vec![
            format!("{:.2}%", stats.cpu_percent),
            format!("{} / {}", stats.mem_usage, stats.mem_limit),
            format!("{:.2}%", stats.mem_percent),
            stats.pids.to_string(),
        ]],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use dcli_engine::{ImageLayer, NetworkMember, PortMapping, VolumeUser};

    #[test]
    fn test_create_table() {
        let table = create_table(
            "title",
            &["column1", "column2", "column3"],
            &[
                vec!["row1".into(), "row2".into(), "row3".into()],
                vec!["row4".into(), "row5".into(), "row6".into()],
            ],
        );
        assert_eq!(
            table,
            "# title\n\n| column1 | column2 | column3 |\n| ------------- | ------------- | -------------|\n| row1 | row2 | row3 |\n| row4 | row5 | row6 |\n"
        );
    }

    #[test]
    fn test_create_table_two_columns() {
        let table = create_table("t", &["Type", "Value"], &[pair("ID", "x")]);
        assert_eq!(
            table,
            "# t\n\n| Type | Value |\n| ------------- | ------------- |\n| ID | x |\n"
        );
    }

    #[test]
    fn test_container_detail_sections() {
        let mut container = mock_container("1234567890", "nginx", "nginx:latest", "running");
        container.ports = vec![PortMapping {
            ip: "0.0.0.0".into(),
            private_port: 80,
            public_port: Some(8080),
            protocol: "tcp".into(),
        }];
        container.env = vec!["PATH=/usr/bin".into(), "NGINX_VERSION=1.25".into()];

        let doc = container_detail(&container);
        assert!(doc.starts_with("# # Container status\n\n| Type | Value |\n"));
        assert!(doc.contains("| ID | 1234567890 |\n"));
        assert!(doc.contains("| Created | Up 2 hours |\n"));
        assert!(doc.contains("| Ports | 0.0.0.0:8080->80/tcp  |\n"));
        assert!(doc.contains("| ENV | PATH=/usr/bin |\n| ENV | NGINX_VERSION=1.25 |\n"));
        assert!(doc.contains("| bridge | 172.17.0.2 | 172.17.0.1 |\n"));
        assert!(doc.ends_with("# Docker hub image url \n https://hub.docker.com/_/nginx"));
        assert_eq!(doc.matches("\n\n---\n\n").count(), 3);
    }

    #[test]
    fn test_container_detail_is_deterministic() {
        let container = mock_container("1", "web", "nginx", "running");
        assert_eq!(container_detail(&container), container_detail(&container));
    }

    #[test]
    fn test_image_detail() {
        let now = 1_700_000_000 + 14 * 24 * 3600;
        let mut image = mock_image("aaaaaaaaaaaaaaaa", "someuser/app:1.0");
        image.history = vec![ImageLayer {
            created: 1_700_000_000,
            created_by: "/bin/sh -c apk add curl | tee /log".into(),
            size: 2048,
            ..Default::default()
        }];

        let doc = image_detail(&image, now);
        assert!(doc.contains("| ID | aaaaaaaaaa |\n"));
        assert!(doc.contains("| Name | someuser/app:1.0 |\n"));
        assert!(doc.contains("| Created | 2 weeks ago |\n"));
        assert!(doc.contains("| Build | linux - amd64 - Docker version 20.10.23 |\n"));
        assert!(doc.contains("| CMD | nginx -g daemon off; |\n"));
        assert!(doc.contains("| Ports | 80/tcp |\n"));
        assert!(doc.contains("# # Layers"));
        assert!(doc.contains("| 2 weeks ago | /bin/sh -c apk add curl \\| tee /log | 2.00 KB |  |\n"));
        assert!(doc.ends_with("https://hub.docker.com/r/someuser/app"));
    }

    #[test]
    fn test_image_detail_dangling_has_no_hub_link() {
        let mut image = mock_image("aaaaaaaaaaaaaaaa", "x");
        image.repo_tags.clear();
        let doc = image_detail(&image, 1_700_000_000);
        assert!(doc.contains("| Name | <none> |"));
        assert!(!doc.contains("hub.docker.com"));
    }

    #[test]
    fn test_network_detail_members() {
        let mut network = mock_network("n1", "backend");
        network.attachable = true;
        let doc = network_detail(&network);
        assert!(doc.contains("| Attachable | true |\n"));
        assert!(!doc.contains("# # Containers"));

        network.containers.push(NetworkMember {
            name: "api".into(),
            ip_address: "172.18.0.3/16".into(),
            ..Default::default()
        });
        let doc = network_detail(&network);
        assert!(doc.contains("| api | 172.18.0.3/16 |\n"));
    }

    #[test]
    fn test_volume_detail_users() {
        let mut volume = mock_volume("pgdata");
        volume.labels.insert("b".into(), "2".into());
        volume.labels.insert("a".into(), "1".into());
        volume.containers = vec![VolumeUser {
            name: "db".into(),
            mounted_at: "/var/lib/postgresql/data".into(),
            read_only: false,
        }];

        let doc = volume_detail(&volume);
        assert!(doc.contains("| Labels | a=1, b=2 |\n"));
        assert!(doc.contains("# # Containers using this volume\n\n| Name | Mounted at | Read -only |\n"));
        assert!(doc.contains("| db | /var/lib/postgresql/data | false |\n"));
    }

    #[test]
    fn test_volume_label_pipes_stay_in_one_cell() {
        let mut volume = mock_volume("pgdata");
        volume.labels.insert("filter".into(), "a|b".into());

        let doc = volume_detail(&volume);
        assert!(doc.contains("| Labels | filter=a\\|b |\n"));
    }

    #[test]
    fn test_stack_detail() {
        let mut network = mock_stack_network("n2", "shop_default", "shop");
        network.containers.push(NetworkMember {
            name: "shop-web-1".into(),
            image: "nginx".into(),
            state: "running".into(),
            ip_address: "172.20.0.2/16".into(),
            ..Default::default()
        });
        let doc = stack_detail(&Stack { network });
        assert!(doc.starts_with("\n # Stack detail shop_default\n\n# # Containers"));
        assert!(doc.contains("| shop-web-1 | running | nginx | 172.20.0.2/16 |\n"));
    }

    #[test]
    fn test_stats_detail() {
        let stats = ContainerStats {
            cpu_percent: 12.3456,
            mem_usage: "12.40MB".into(),
            mem_limit: "1.00GB".into(),
            mem_percent: 1.2109,
            pids: 7,
            ..Default::default()
        };
        let doc = stats_detail(&stats);
        assert!(doc.contains("| CPU | MEM USAGE/LIMIT | MEM | PIDS |\n"));
        assert!(doc.contains("| 12.35% | 12.40MB / 1.00GB | 1.21% | 7 |\n"));
    }
}
