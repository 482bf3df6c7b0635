use std::path::PathBuf;

const DATA_DIR_ENV: &str = "CALL_LEDGER_DATA_DIR";
const DATA_DIR_NAME: &str = "call-ledger";

#[derive(Debug, Default)]
struct DataDirSources {
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    xdg_data_home: Option<PathBuf>,
    home: Option<PathBuf>,
}

fn non_empty_env(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// `--data-dir`, then `CALL_LEDGER_DATA_DIR`, then the XDG data home.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, String> {
    resolve(DataDirSources {
        flag,
        env: non_empty_env(DATA_DIR_ENV),
        xdg_data_home: non_empty_env("XDG_DATA_HOME"),
        home: non_empty_env("HOME"),
    })
}

fn resolve(sources: DataDirSources) -> Result<PathBuf, String> {
    if let Some(dir) = sources.flag.or(sources.env) {
        return Ok(dir);
    }
    if let Some(xdg) = sources.xdg_data_home {
        return Ok(xdg.join(DATA_DIR_NAME));
    }
    let home = sources
        .home
        .ok_or_else(|| "resolve HOME: not set".to_string())?;
    Ok(home.join(".local").join("share").join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment() {
        let dir = resolve(DataDirSources {
            flag: Some(PathBuf::from("/srv/flag")),
            env: Some(PathBuf::from("/srv/env")),
            ..Default::default()
        })
        .expect("resolve");
        assert_eq!(dir, PathBuf::from("/srv/flag"));
    }

    #[test]
    fn falls_back_to_xdg_then_home() {
        let xdg = resolve(DataDirSources {
            xdg_data_home: Some(PathBuf::from("/data")),
            home: Some(PathBuf::from("/home/user")),
            ..Default::default()
        })
        .expect("resolve");
        assert_eq!(xdg, PathBuf::from("/data/call-ledger"));

        let home = resolve(DataDirSources {
            home: Some(PathBuf::from("/home/user")),
            ..Default::default()
        })
        .expect("resolve");
        assert_eq!(home, PathBuf::from("/home/user/.local/share/call-ledger"));

        assert!(resolve(DataDirSources::default()).is_err());
    }
}
