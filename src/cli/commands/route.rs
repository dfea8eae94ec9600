use crate::cli::{display::PanelDisplay, RouteArgs};
use crate::core::ClientResult;
use crate::gate::resolve;

pub fn execute(args: RouteArgs) -> ClientResult<()> {
    let route = resolve(&args.path);
    PanelDisplay::display_route(&args.path, &route);
    Ok(())
}
