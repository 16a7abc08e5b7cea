//! Class identifiers.
//!
//! Classes are identified by plain strings. Rust types get a stable
//! identifier from [`class_name`]; [`qualify`] builds identifiers for
//! [`Container::factory`](crate::container::Container::factory).

use std::any::type_name;

/// Separator between namespace segments of a class identifier.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// The class identifier of the Rust type `T`.
///
/// ```
/// use autowire_container::naming::class_name;
///
/// assert_eq!(class_name::<String>(), "alloc::string::String");
/// ```
#[inline]
pub fn class_name<T: ?Sized + 'static>() -> &'static str {
    type_name::<T>()
}

/// Returns `true` if `name` already carries a namespace.
#[inline]
pub fn is_qualified(name: &str) -> bool {
    name.contains(NAMESPACE_SEPARATOR)
}

/// Upper-cases the first letter of every whitespace-separated word.
///
/// ```
/// use autowire_container::naming::capitalize_words;
///
/// assert_eq!(capitalize_words("session"), "Session");
/// assert_eq!(capitalize_words("file cache"), "File Cache");
/// ```
pub fn capitalize_words(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;

    for ch in name.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }

    out
}

/// Builds the identifier `factory` instantiates.
///
/// Qualified names are kept as they are; anything else becomes
/// `namespace + capitalize_words(name)`.
///
/// ```
/// use autowire_container::naming::qualify;
///
/// assert_eq!(qualify("redis", "cache::driver::"), "cache::driver::Redis");
/// assert_eq!(qualify("app::cache::Redis", "ignored::"), "app::cache::Redis");
/// ```
pub fn qualify(name: &str, namespace: &str) -> String {
    if is_qualified(name) {
        name.to_string()
    } else {
        format!("{namespace}{}", capitalize_words(name))
    }
}
