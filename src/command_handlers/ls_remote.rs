use crate::manager::{Manager, RemoteVersion};
use anyhow::Result;
use std::collections::HashSet;

pub struct LsRemoteArgs<'a> {
    pub tool: &'a str,
    /// 0 shows everything.
    pub limit: usize,
    pub lts_only: bool,
}

pub fn run_ls_remote(manager: &Manager, args: LsRemoteArgs) -> Result<()> {
    // LTS filtering has to see the whole listing before truncation.
    let fetch_limit = if args.lts_only { 0 } else { args.limit };
    let versions = select(
        manager.list_remote(args.tool, fetch_limit)?,
        args.lts_only,
        args.limit,
    );
    if versions.is_empty() {
        println!("No remote versions found for {}", args.tool);
        return Ok(());
    }
    let installed: HashSet<String> = manager.list(args.tool)?.into_iter().collect();
    for v in versions {
        let mut line = v.version.clone();
        if let Some(codename) = &v.lts {
            line.push_str(&format!("  (lts: {codename})"));
        }
        if installed.contains(&v.version) {
            line.push_str("  [installed]");
        }
        println!("{line}");
    }
    Ok(())
}

fn select(versions: Vec<RemoteVersion>, lts_only: bool, limit: usize) -> Vec<RemoteVersion> {
    let filtered = versions.into_iter().filter(|v| !lts_only || v.is_lts());
    if limit > 0 {
        filtered.take(limit).collect()
    } else {
        filtered.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rv(version: &str, lts: Option<&str>) -> RemoteVersion {
        RemoteVersion {
            version: version.into(),
            lts: lts.map(str::to_string),
        }
    }

    #[test]
    fn lts_filter_applies_before_limit() {
        let all = vec![
            rv("21.5.0", None),
            rv("20.10.0", Some("Iron")),
            rv("21.4.0", None),
            rv("18.19.0", Some("Hydrogen")),
        ];
        let got = select(all.clone(), true, 2);
        assert_eq!(got, vec![rv("20.10.0", Some("Iron")), rv("18.19.0", Some("Hydrogen"))]);
        assert_eq!(select(all, false, 0).len(), 4);
    }
}
