//! `portico name` -- print the load balancer name for a UID.

use portico_core::naming;

use crate::cli::{GlobalOpts, NameArgs};
use crate::output;

pub fn handle(args: &NameArgs, global: &GlobalOpts) {
    output::print_output(&naming::exposure_name(&args.uid), global.quiet);
}
