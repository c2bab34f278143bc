use hickory_proto::rr::{Name, Record};

/// Renames every record owned by `lookup_name` back to `orig_name`.
///
/// Owner comparison ignores case. Records owned by any other name, such as
/// CNAME targets further down the chain, are left untouched.
pub fn restore_names(records: &mut [Record], lookup_name: &Name, orig_name: &Name) {
    for record in records.iter_mut() {
        if record.name() == lookup_name {
            record.set_name(orig_name.clone());
        }
    }
}
