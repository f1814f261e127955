use serde_json::Value;

/// Recursively apply a text scrub to every string leaf of a JSON value,
/// in place, preserving shape.
///
/// Objects are walked through every value. Array elements are walked only
/// when they are themselves objects, so attachment-like lists of opaque
/// items pass through untouched. Strings are replaced by the scrub
/// output; numbers, booleans and nulls are left alone.
pub fn walk_value<F>(value: &mut Value, scrub: &F)
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Object(map) => {
            for (_key, entry) in map.iter_mut() {
                walk_value(entry, scrub);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if item.is_object() {
                    walk_value(item, scrub);
                }
            }
        }
        Value::String(text) => {
            *text = scrub(text);
        }
        _ => {}
    }
}
