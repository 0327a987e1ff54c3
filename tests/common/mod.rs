//! Stub external tools for integration tests
//!
//! Both terraform and docker are modeled as capability interfaces (spawn
//! a process, capture streams and exit code), so the suite substitutes
//! small shell scripts for the real binaries. The terraform stub enforces
//! a required-variable list and writes a canned state document to the
//! requested `-state=` path; the docker stub prints a fixed container id
//! for `run` and executes `exec` commands locally.

// Not every integration test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Opt into `RUST_LOG=debug` output for a test run
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const STATE_JSON: &str = r#"{
    "version": 4,
    "outputs": {
        "port": { "type": "string", "value": "6800" }
    },
    "resources": [
        {
            "type": "coder_script",
            "name": "main",
            "provider": "provider[\"registry.terraform.io/coder/coder\"]",
            "instances": [
                { "attributes": { "script": "echo hello", "agent_id": "a-1" } }
            ]
        }
    ]
}"#;

pub const STUB_CONTAINER_ID: &str = "c0ffee1dc0ffee1d";

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Write a stub terraform that requires `required` variables and emits
/// `state_json` on success. Returns the stub's path.
pub fn write_terraform_stub(dir: &Path, required: &[&str], state_json: &str) -> PathBuf {
    let canned = dir.join("canned-state.json");
    fs::write(&canned, state_json).unwrap();

    let mut script = String::from("#!/bin/sh\nsub=\"$1\"; shift\n[ \"$sub\" = init ] && exit 0\n");
    for name in required {
        script.push_str(&format!(
            "if [ -z \"$(printenv TF_VAR_{name})\" ]; then \
             printf 'Error: input variable \"%s\" is not set\\n' '{name}' >&2; exit 1; fi\n"
        ));
    }
    script.push_str(
        "state=''\nfor arg in \"$@\"; do case \"$arg\" in -state=*) state=\"${arg#-state=}\";; esac; done\n",
    );
    script.push_str(&format!("cat '{}' > \"$state\"\n", canned.display()));

    let path = dir.join("terraform-stub");
    write_executable(&path, &script);
    path
}

/// Write a stub terraform that accepts any variable set, including none
pub fn write_lenient_terraform_stub(dir: &Path, state_json: &str) -> PathBuf {
    write_terraform_stub(dir, &[], state_json)
}

/// Write a stub docker whose `exec` runs the given command locally
pub fn write_docker_stub(dir: &Path) -> PathBuf {
    let script = format!(
        "#!/bin/sh\n\
         cmd=\"$1\"; shift\n\
         case \"$cmd\" in\n\
           run) echo '{STUB_CONTAINER_ID}' ;;\n\
           exec) shift; exec \"$@\" ;;\n\
           rm) exit 0 ;;\n\
           *) echo \"unexpected subcommand: $cmd\"; exit 64 ;;\n\
         esac\n"
    );
    let path = dir.join("docker-stub");
    write_executable(&path, &script);
    path
}
