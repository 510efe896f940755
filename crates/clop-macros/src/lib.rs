mod ast;
mod emit;
mod parse;

#[proc_macro_derive(Clop, attributes(clop))]
pub fn clop(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Stub out the code, but let rust-analyzer resolve the invocation
    #[cfg(not(test))]
    {
        let text = match parse::clop(_ts) {
            Ok(clop) => emit::emit(&clop),
            Err(err) => format!("compile_error!({:?});", format!("invalid clop struct, {err}")),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let clop = parse::clop(ts).unwrap();
    emit::emit(&clop)
}
