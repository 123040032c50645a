//! Metadata carried by generated parameter structs.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A remote function described by its parameter struct.
///
/// Generated clients implement this for every `<Function>Params` struct so
/// that [`BamlRuntime::call_function`](crate::BamlRuntime::call_function) and
/// [`BamlRuntime::stream_function`](crate::BamlRuntime::stream_function) can
/// pick up the wire name, backend identifier and result type without the
/// caller spelling them out.
///
/// ## Examples
///
/// ```
/// use baml::BamlFunction;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct GreetParams {
///     name: String,
/// }
///
/// impl BamlFunction for GreetParams {
///     const NAME: &'static str = "Greet";
///     const CLIENT: Option<&'static str> = Some("openai/gpt-4o");
///     type Output = String;
/// }
///
/// assert_eq!(GreetParams::NAME, "Greet");
/// ```
pub trait BamlFunction: Serialize {
    /// Function name exactly as declared in the schema.
    const NAME: &'static str;

    /// Backend identifier from the function's `client` line, if any.
    const CLIENT: Option<&'static str>;

    /// Result type the execution engine returns for this function.
    type Output: DeserializeOwned + Send + 'static;
}
