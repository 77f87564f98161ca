//! `portico plan` -- show the object graph an exposure would own.
//!
//! Runs the desired-state builder only; no Data Plane access.

use serde::Serialize;
use tabled::Tabled;

use portico_core::desired;

use crate::cli::{ExposureFileArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Clone, Serialize, Tabled)]
struct PlannedObject {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Target")]
    target: String,
}

pub fn handle(args: &ExposureFileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let file = util::load_exposure_file(&args.file)?;
    let graph = desired::build(&file.exposure, &file.nodes)?;

    let mut objects = Vec::with_capacity(graph.object_count());
    for pool in &graph.pools {
        objects.push(PlannedObject {
            kind: "backend".into(),
            parent: String::new(),
            name: pool.backend.name.clone(),
            target: "roundrobin".into(),
        });
        objects.extend(pool.members.iter().map(|m| PlannedObject {
            kind: "server".into(),
            parent: pool.backend.name.clone(),
            name: m.name.clone(),
            target: format!("{}:{}", m.address, m.port.unwrap_or_default()),
        }));
    }
    for group in &graph.groups {
        objects.push(PlannedObject {
            kind: "frontend".into(),
            parent: String::new(),
            name: group.frontend.name.clone(),
            target: group.frontend.default_backend.clone().unwrap_or_default(),
        });
        objects.extend(group.binds.iter().map(|b| PlannedObject {
            kind: "bind".into(),
            parent: group.frontend.name.clone(),
            name: b.name.clone(),
            target: format!(
                "{}:{}",
                b.address.as_deref().unwrap_or_default(),
                b.port.unwrap_or_default()
            ),
        }));
    }

    let out = output::render_list(
        global.output,
        &objects,
        PlannedObject::clone,
        |o| o.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
