use crate::generate::{GeneratedFragment, Generator, ImportSet};
use crate::host::{CodeGenerator, Dependencies};
use crate::symbols::{SourceFile, qualify};
use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};

/// Logical name of a generated file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmittedFileKey {
    pub package: String,
    pub file_name: String,
}

impl EmittedFileKey {
    pub fn qualified_name(&self) -> String {
        qualify(&self.package, &self.file_name)
    }
}

impl fmt::Display for EmittedFileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Written(EmittedFileKey),
    /// Already emitted earlier in this run
    Duplicate(EmittedFileKey),
    /// No fragments, nothing to write
    Empty,
}

/// Writes one generated file per source file, at most once per run
#[derive(Debug, Default)]
pub struct FileEmitter {
    generated: HashSet<String>,
}

impl FileEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct files emitted so far
    pub fn len(&self) -> usize {
        self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }

    pub fn key_for(source: &SourceFile, package: &str, suffix: &str) -> EmittedFileKey {
        EmittedFileKey {
            package: package.to_string(),
            file_name: format!("{}{}", source.base_name(), suffix),
        }
    }

    /// Write `fragments` and their `imports` as the test file of `source` in `package`.
    ///
    /// The file is declared to depend on `source` alone so that incremental
    /// builds regenerate it only when that file changes.
    #[allow(clippy::too_many_arguments)]
    pub fn emit(
        &mut self,
        codegen: &mut dyn CodeGenerator,
        generator: &dyn Generator,
        source: &SourceFile,
        package: &str,
        suffix: &str,
        imports: &ImportSet,
        fragments: &[GeneratedFragment],
    ) -> io::Result<EmitOutcome> {
        if fragments.is_empty() {
            return Ok(EmitOutcome::Empty);
        }

        let key = Self::key_for(source, package, suffix);
        let qualified = key.qualified_name();
        if self.generated.contains(&qualified) {
            tracing::debug!(file = %qualified, "already generated");
            return Ok(EmitOutcome::Duplicate(key));
        }

        let code = generator.render_file(&key.package, imports, fragments);
        {
            let mut writer = codegen.create_new_file(
                Dependencies::isolating(&source.path),
                &key.package,
                &key.file_name,
            )?;
            writer.write_all(code.as_bytes())?;
            writer.flush()?;
        }
        self.generated.insert(qualified);

        tracing::info!(
            file = %key,
            functions = fragments.len(),
            source = %source.path,
            "generated"
        );
        Ok(EmitOutcome::Written(key))
    }
}
