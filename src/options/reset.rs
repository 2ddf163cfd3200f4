//! Multi-pass reset between composite job components.

use crate::options::registry::Registry;
use crate::state::JobOptions;

/// Restore option defaults before processing a job component.
///
/// On the first pass every descriptor is reset. Later passes reset only
/// descriptors marked `reset_each_pass`; the rest carry their value over
/// from the previous component.
pub fn reset_all(registry: &mut Registry, opts: &mut JobOptions, first_pass: bool) {
    for descriptor in registry.iter_mut() {
        if !first_pass && !descriptor.reset_each_pass() {
            continue;
        }
        descriptor.reset(opts);
        descriptor.explicitly_set = false;
    }
}
