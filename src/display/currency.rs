//! Currency display formatting

use crate::currency::CurrencyRegistry;

/// Format the registry as an id/name table, marking custom currencies
pub fn format_currency_list(registry: &CurrencyRegistry, is_custom: impl Fn(u32) -> bool) -> String {
    if registry.is_empty() {
        return "No currencies configured.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:>8}  {}\n", "ID", "Name"));
    output.push_str(&format!("{:->8}  {:-<20}\n", "", ""));

    for (id, name) in registry.iter() {
        let marker = if is_custom(id) { " (custom)" } else { "" };
        output.push_str(&format!("{:>8}  {}{}\n", id, name, marker));
    }

    output
}
