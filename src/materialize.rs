use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::Path;

pub const ENV_EXAMPLE_FILE: &str = ".env.example";
pub const ENV_FILE: &str = ".env";
pub const MANIFEST_FILE: &str = "package.json";

/// Placeholder in `.env.example` that receives the generated secret.
pub const SECRET_PLACEHOLDER: &str = "change-this-in-production";

/// What the environment stage actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Materialized {
    /// `.env` was created from `.env.example`.
    pub env_written: bool,
}

/// Prepare a freshly cloned template for local use:
///
/// - copy `.env.example` to `.env` (when present) and put `secret` in place
///   of the first [`SECRET_PLACEHOLDER`];
/// - set the `name` field of `package.json` to `project_name`.
///
/// A missing `.env.example` is fine; a missing or malformed manifest is not.
pub fn materialize(project_path: &Path, project_name: &str, secret: &str) -> Result<Materialized> {
    let example = project_path.join(ENV_EXAMPLE_FILE);
    let env_written = if example.exists() {
        write_env(&example, &project_path.join(ENV_FILE), secret)?;
        true
    } else {
        false
    };

    rename_manifest(&project_path.join(MANIFEST_FILE), project_name)?;

    Ok(Materialized { env_written })
}

fn write_env(example: &Path, env: &Path, secret: &str) -> Result<()> {
    std::fs::copy(example, env)
        .with_context(|| format!("Cannot copy '{}' to '{}'", example.display(), env.display()))?;
    let content = std::fs::read_to_string(env)
        .with_context(|| format!("Cannot read '{}'", env.display()))?;
    std::fs::write(env, substitute_secret(&content, secret))
        .with_context(|| format!("Cannot write '{}'", env.display()))?;
    Ok(())
}

/// Replace the first occurrence of the placeholder only.
pub fn substitute_secret(content: &str, secret: &str) -> String {
    content.replacen(SECRET_PLACEHOLDER, secret, 1)
}

fn rename_manifest(path: &Path, project_name: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read manifest '{}'", path.display()))?;
    let updated = set_manifest_name(&content, project_name)
        .with_context(|| format!("Invalid manifest '{}'", path.display()))?;
    std::fs::write(path, updated)
        .with_context(|| format!("Cannot write manifest '{}'", path.display()))?;
    Ok(())
}

/// Rewrite the `name` field of a JSON manifest, keeping key order and
/// re-serializing with two-space indentation.
pub fn set_manifest_name(content: &str, project_name: &str) -> Result<String> {
    let mut manifest: Value = serde_json::from_str(content)?;
    let Some(fields) = manifest.as_object_mut() else {
        bail!("top-level value is not an object");
    };
    fields.insert("name".into(), Value::String(project_name.to_string()));
    Ok(serde_json::to_string_pretty(&manifest)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SECRET: &str = "Xy7!Xy7!Xy7!Xy7!Xy7!Xy7!Xy7!Xy7!";

    fn scratch(env_example: Option<&str>, manifest: Option<&str>) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        if let Some(e) = env_example {
            std::fs::write(dir.path().join(ENV_EXAMPLE_FILE), e).unwrap();
        }
        if let Some(m) = manifest {
            std::fs::write(dir.path().join(MANIFEST_FILE), m).unwrap();
        }
        dir
    }

    #[test]
    fn env_receives_secret_in_place_of_placeholder() {
        let dir = scratch(
            Some("PORT=3000\nJWT_SECRET=change-this-in-production\n"),
            Some(r#"{"name": "velist"}"#),
        );
        let out = materialize(dir.path(), "demo-app", SECRET).unwrap();
        assert!(out.env_written);

        let env = std::fs::read_to_string(dir.path().join(ENV_FILE)).unwrap();
        assert_eq!(env, format!("PORT=3000\nJWT_SECRET={SECRET}\n"));
        assert!(!env.contains(SECRET_PLACEHOLDER));

        // The example file itself is left alone.
        let example = std::fs::read_to_string(dir.path().join(ENV_EXAMPLE_FILE)).unwrap();
        assert!(example.contains(SECRET_PLACEHOLDER));
    }

    #[test]
    fn only_first_placeholder_is_replaced() {
        let input = "A=change-this-in-production\nB=change-this-in-production\n";
        let out = substitute_secret(input, "s3cret");
        assert_eq!(out, "A=s3cret\nB=change-this-in-production\n");
    }

    #[test]
    fn missing_env_example_still_renames_manifest() {
        let dir = scratch(None, Some(r#"{"name": "velist"}"#));
        let out = materialize(dir.path(), "demo-app", SECRET).unwrap();
        assert!(!out.env_written);
        assert!(!dir.path().join(ENV_FILE).exists());

        let manifest = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let v: Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(v["name"], "demo-app");
    }

    #[test]
    fn manifest_keeps_key_order_and_two_space_indent() {
        let rewritten = set_manifest_name(
            r#"{"name":"velist","version":"1.0.0","scripts":{"dev":"bun run src/index.ts"}}"#,
            "demo-app",
        )
        .unwrap();
        assert_eq!(
            rewritten,
            concat!(
                "{\n",
                "  \"name\": \"demo-app\",\n",
                "  \"version\": \"1.0.0\",\n",
                "  \"scripts\": {\n",
                "    \"dev\": \"bun run src/index.ts\"\n",
                "  }\n",
                "}"
            )
        );
    }

    #[test]
    fn manifest_without_name_gets_one() {
        let rewritten = set_manifest_name(r#"{"private": true}"#, "demo-app").unwrap();
        let v: Value = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(v["name"], "demo-app");
        assert_eq!(v["private"], true);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(set_manifest_name("{not json", "demo-app").is_err());
        assert!(set_manifest_name("[1, 2]", "demo-app").is_err());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = scratch(Some("JWT_SECRET=change-this-in-production\n"), None);
        assert!(materialize(dir.path(), "demo-app", SECRET).is_err());
    }
}
