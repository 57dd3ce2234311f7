mod imports;
mod kotlin;
mod output;

pub use imports::ImportSet;
pub use kotlin::KotlinGenerator;
pub use output::Output;

use crate::host::Resolver;
use crate::select::EligibleFunction;

/// One generated test function
#[derive(Debug, Clone)]
pub struct GeneratedFragment {
    pub function_name: String,
    pub code: String,
}

/// Generator trait - turns selected functions into source text
pub trait Generator {
    /// Generate the test function for one eligible function. `imports` is
    /// shared by every function of the file being built.
    fn generate(
        &self,
        resolver: &dyn Resolver,
        function: &EligibleFunction<'_>,
        imports: &mut ImportSet,
    ) -> GeneratedFragment;

    /// Assemble a complete file: package, imports, then functions in order
    fn render_file(
        &self,
        package: &str,
        imports: &ImportSet,
        fragments: &[GeneratedFragment],
    ) -> String;
}
