//! Project files written next to a snapshot: a `.env` copy of the env file
//! and an example Edge Function.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Location of the example function relative to the project root.
pub const EXAMPLE_FUNCTION_PATH: &str = "supabase/functions/example-function/index.ts";

const EXAMPLE_FUNCTION: &str = r#"import { serve } from "https://deno.land/std@0.168.0/http/server.ts"

console.log("Hello from Supabase Edge Function!")

serve(async (req) => {
  const { name } = await req.json()

  const data = {
    message: `Hello ${name || 'World'}!`,
    timestamp: new Date().toISOString(),
  }

  return new Response(
    JSON.stringify(data),
    { headers: { "Content-Type": "application/json" } },
  )
})
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scaffolded {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Copy `src` to `dst` byte for byte, overwriting `dst`.
///
/// No-op when both name the same file.
pub fn copy_env_file(src: &Path, dst: &Path) -> Result<()> {
    if let (Ok(a), Ok(b)) = (src.canonicalize(), dst.canonicalize()) {
        if a == b {
            return Ok(());
        }
    }

    std::fs::copy(src, dst).map_err(|e| {
        Error::Other(format!(
            "cannot copy {} to {}: {e}",
            src.display(),
            dst.display()
        ))
    })?;
    tracing::info!(from = %src.display(), to = %dst.display(), "wrote env file");
    Ok(())
}

/// Create the example Edge Function under `root` unless one is already there.
pub fn create_example_function(root: &Path) -> Result<Scaffolded> {
    let path = root.join(EXAMPLE_FUNCTION_PATH);
    if path.exists() {
        return Ok(Scaffolded::AlreadyExists(path));
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, EXAMPLE_FUNCTION)?;
    tracing::info!(path = %path.display(), "created example edge function");
    Ok(Scaffolded::Created(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_function_is_created_once() {
        let dir = tempfile::tempdir().unwrap();

        let first = create_example_function(dir.path()).unwrap();
        let path = dir.path().join(EXAMPLE_FUNCTION_PATH);
        assert_eq!(first, Scaffolded::Created(path.clone()));
        assert!(std::fs::read_to_string(&path).unwrap().contains("serve("));

        std::fs::write(&path, "// edited").unwrap();
        let second = create_example_function(dir.path()).unwrap();
        assert_eq!(second, Scaffolded::AlreadyExists(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "// edited");
    }

    #[test]
    fn copy_env_file_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("env_config.txt");
        let dst = dir.path().join(".env");
        std::fs::write(&src, "# comment\nSUPABASE_URL=https://abc.supabase.co\n").unwrap();

        copy_env_file(&src, &dst).unwrap();
        assert_eq!(
            std::fs::read_to_string(&dst).unwrap(),
            std::fs::read_to_string(&src).unwrap()
        );
    }

    #[test]
    fn copy_env_file_onto_itself_keeps_contents() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join(".env");
        std::fs::write(&env, "SUPABASE_URL=https://abc.supabase.co\n").unwrap();

        copy_env_file(&env, &env).unwrap();
        assert!(!std::fs::read_to_string(&env).unwrap().is_empty());
    }

    #[test]
    fn copy_env_file_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_env_file(&dir.path().join("nope.txt"), &dir.path().join(".env"))
            .unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }
}
