use log::debug;

use super::{ItemStore, UNKNOWN_OWNER};
use crate::error::{Result, SysconfError};

/// Looks up the `type` field of a template by name.
///
/// The copy operator uses this to carry type metadata to the destination
/// backend without depending on the template layer.
pub trait TemplateTypes {
    /// Type of the template called `template`, or `None` when it is unknown.
    fn template_type(&self, template: &str) -> Option<String>;
}

/// Copy `item` from `src` into `dest`.
///
/// `dest` must not already hold `item`; nothing is merged. Owners are added
/// first, then fields, flags, and variables. Variable values are read through
/// the source's flag accessor, so a variable with no flag of the same name
/// lands empty.
///
/// Nothing is rolled back: when the destination refuses an owner the copy
/// stops and `dest` keeps whatever was already written.
///
/// # Errors
///
/// Returns [`SysconfError::StoreRejected`] when `dest` refuses an owner.
pub fn copy_item(
    item: &str,
    src: &dyn ItemStore,
    dest: &mut dyn ItemStore,
    types: &dyn TemplateTypes,
) -> Result<()> {
    debug!(target: "sysconf::store", "copying {item} from {} to {}", src.name(), dest.name());

    let owners = src
        .owners(item)
        .unwrap_or_else(|| vec![UNKNOWN_OWNER.to_owned()]);
    let item_type = src
        .field(item, "template")
        .and_then(|template| types.template_type(&template))
        .unwrap_or_default();

    for owner in &owners {
        if dest.add_owner(item, owner, &item_type).is_none() {
            return Err(SysconfError::StoreRejected {
                store: dest.name().to_owned(),
                item: item.to_owned(),
                owner: owner.clone(),
            });
        }
    }

    for field in src.fields(item).unwrap_or_default() {
        let value = src.field(item, &field).unwrap_or_default();
        dest.set_field(item, &field, &value);
    }

    for flag in src.flags(item).unwrap_or_default() {
        let value = src.flag(item, &flag).unwrap_or_default();
        dest.set_flag(item, &flag, &value);
    }

    for variable in src.variables(item).unwrap_or_default() {
        let value = src.flag(item, &variable).unwrap_or_default();
        dest.set_variable(item, &variable, &value);
    }

    Ok(())
}
