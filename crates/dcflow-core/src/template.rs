//! Boot payload rendering
//!
//! Instances receive a cloud-init document rendered with Tera. The
//! document is produced from a project template when one exists, otherwise
//! from the built-in template below.

use crate::error::{ModelError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha_crypt::{Sha512Params, sha512_simple};
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, info};

/// File name looked up in the project templates directory
pub const TEMPLATE_FILE_NAME: &str = "cloudinit.yml.j2";

/// SHA-512 crypt rounds used for the instance user password
pub const PASSWORD_HASH_ROUNDS: usize = 4096;

const BUILTIN_TEMPLATE: &str = r#"#cloud-config
hostname: {{ hostname }}
fqdn: {{ hostname }}
manage_etc_hosts: true
ssh_pwauth: false
users:
  - name: {{ username }}
    groups: wheel
    shell: /bin/bash
    sudo: ALL=(ALL) NOPASSWD:ALL
    lock_passwd: false
    passwd: {{ hashed_password }}
    ssh_authorized_keys:
      - {{ public_key }}
"#;

/// Values an instance's boot payload is rendered with
#[derive(Debug, Clone)]
pub struct BootParams<'a> {
    pub username: &'a str,
    pub hostname: &'a str,
    pub password: &'a str,
    pub public_key: &'a str,
}

/// A cloud-init template
#[derive(Debug, Clone)]
pub struct BootTemplate {
    source: String,
}

impl BootTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }

    /// Template from `<templates_dir>/cloudinit.yml.j2`, or the built-in one
    /// when the directory or file does not exist
    pub fn load(templates_dir: Option<&Path>) -> Result<Self> {
        let Some(dir) = templates_dir else {
            return Ok(Self::builtin());
        };
        let path = dir.join(TEMPLATE_FILE_NAME);
        if !path.is_file() {
            debug!(path = %path.display(), "No project boot template, using built-in");
            return Ok(Self::builtin());
        }

        let source = std::fs::read_to_string(&path).map_err(|e| ModelError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "Loaded boot template");
        Ok(Self::new(source))
    }

    /// Render the template as plain text
    pub fn render(&self, params: &BootParams<'_>) -> Result<String> {
        let hashed = hash_password(params.password)?;

        let mut context = Context::new();
        context.insert("username", params.username);
        context.insert("hostname", params.hostname);
        context.insert("hashed_password", &hashed);
        context.insert("public_key", params.public_key.trim());

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.render_str(&self.source, &context)
            .map_err(|e| ModelError::TemplateRenderError(error_detail(&e)))
    }

    /// Render the template and base64 encode it, ready to be sent as user data
    pub fn render_encoded(&self, params: &BootParams<'_>) -> Result<String> {
        let rendered = self.render(params)?;
        Ok(STANDARD.encode(rendered.as_bytes()))
    }
}

impl Default for BootTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

/// SHA-512 crypt hash (`$6$rounds=4096$...`) with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let params = Sha512Params::new(PASSWORD_HASH_ROUNDS)
        .map_err(|e| ModelError::PasswordHash(format!("{:?}", e)))?;
    sha512_simple(password, &params).map_err(|e| ModelError::PasswordHash(format!("{:?}", e)))
}

fn error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    details.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn params() -> BootParams<'static> {
        BootParams {
            username: "awsadmin",
            hostname: "admin.maxmin.it",
            password: "secret",
            public_key: "ssh-rsa AAAAB3Nza admin-box\n",
        }
    }

    #[test]
    fn test_builtin_template_renders_all_values() {
        let rendered = BootTemplate::builtin().render(&params()).unwrap();

        assert!(rendered.starts_with("#cloud-config"));
        assert!(rendered.contains("name: awsadmin"));
        assert!(rendered.contains("hostname: admin.maxmin.it"));
        assert!(rendered.contains("- ssh-rsa AAAAB3Nza admin-box\n"));
        assert!(rendered.contains("passwd: $6$rounds=4096$"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_render_encoded_is_base64_of_render() {
        let template = BootTemplate::new("user={{ username }}");
        let encoded = template.render_encoded(&params()).unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"user=awsadmin");
    }

    #[test]
    fn test_undefined_variable_is_template_error() {
        let template = BootTemplate::new("{{ missing }}");
        let err = template.render(&params()).unwrap_err();
        assert!(matches!(err, ModelError::TemplateRenderError(_)));
    }

    #[test]
    fn test_load_prefers_project_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(TEMPLATE_FILE_NAME), "host={{ hostname }}").unwrap();

        let template = BootTemplate::load(Some(dir.path())).unwrap();
        assert_eq!(template.render(&params()).unwrap(), "host=admin.maxmin.it");
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let dir = TempDir::new().unwrap();
        let template = BootTemplate::load(Some(dir.path())).unwrap();
        assert!(template.render(&params()).unwrap().contains("#cloud-config"));

        let template = BootTemplate::load(None).unwrap();
        assert!(template.render(&params()).unwrap().contains("#cloud-config"));
    }

    #[test]
    fn test_hash_password_uses_sha512_crypt() {
        let hashed = hash_password("secret").unwrap();
        assert!(hashed.starts_with("$6$rounds=4096$"));
        assert_ne!(hashed, hash_password("secret").unwrap());
    }
}
