/// Prepend a shared prelude (e.g. the noise functions) to a shader source.
/// Plain concatenation: the prelude's functions become part of the module.
pub fn inject(prelude: &str, source: &str) -> String {
    let mut out = String::with_capacity(prelude.len() + source.len() + 1);
    out.push_str(prelude);
    out.push('\n');
    out.push_str(source);
    out
}
