//! Command implementations over [`VfsOps`].
//!
//! Output goes to the supplied writer so commands can be exercised in tests.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::{Duration, Instant};

use canvasfs_kernel::{FileAttr, VfsOps};

/// Bytes requested per `read` call by `cat`.
pub const READ_CHUNK: u32 = 64 * 1024;

/// List a directory, one name per line.
pub async fn ls(fs: &dyn VfsOps, path: &str, out: &mut dyn Write) -> Result<()> {
    for name in fs.readdir(path).await? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub async fn stat(fs: &dyn VfsOps, path: &str, out: &mut dyn Write) -> Result<()> {
    let attr = fs.getattr(path).await?;
    write_attr(path, &attr, out)?;
    Ok(())
}

fn write_attr(path: &str, attr: &FileAttr, out: &mut dyn Write) -> std::io::Result<()> {
    let kind = if attr.is_dir() { "directory" } else { "regular file" };
    writeln!(out, "  File: {path}")?;
    writeln!(out, "  Size: {:<12} Type: {kind}", attr.size)?;
    writeln!(out, " Inode: {:<12} Links: {}", attr.ino, attr.nlink)?;
    writeln!(
        out,
        "Access: ({:04o})      Uid: {}  Gid: {}",
        attr.mode() & 0o7777,
        attr.uid,
        attr.gid
    )?;
    writeln!(out, "Access: {}", timestamp(attr.atime))?;
    writeln!(out, "Modify: {}", timestamp(attr.mtime))?;
    writeln!(out, "Change: {}", timestamp(attr.ctime))?;
    Ok(())
}

fn timestamp(t: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(t).format("%Y-%m-%d %H:%M:%S %z").to_string()
}

/// Open, read in [`READ_CHUNK`] pieces, release.
///
/// The handle is released even when a read fails.
pub async fn cat(fs: &dyn VfsOps, path: &str, out: &mut dyn Write) -> Result<u64> {
    let fh = fs.open(path, 0).await?;
    let copied = copy_out(fs, path, fh, out).await;
    fs.release(path, fh).await?;
    copied
}

async fn copy_out(fs: &dyn VfsOps, path: &str, fh: u64, out: &mut dyn Write) -> Result<u64> {
    let mut offset = 0u64;
    loop {
        let chunk = fs.read(path, fh, offset, READ_CHUNK).await?;
        if chunk.is_empty() {
            break;
        }
        out.write_all(&chunk)?;
        offset += chunk.len() as u64;
        if chunk.len() < READ_CHUNK as usize {
            break;
        }
    }
    out.flush()?;
    Ok(offset)
}

pub async fn mkdir(fs: &dyn VfsOps, path: &str) -> Result<()> {
    fs.mkdir(path, 0o755).await?;
    Ok(())
}

pub async fn rmdir(fs: &dyn VfsOps, path: &str) -> Result<()> {
    fs.rmdir(path).await?;
    Ok(())
}

pub async fn statfs(fs: &dyn VfsOps, out: &mut dyn Write) -> Result<()> {
    let st = fs.statfs("/").await?;
    writeln!(out, "Block size: {:<10} Fragment size: {}", st.bsize, st.frsize)?;
    writeln!(
        out,
        "Blocks: Total: {:<10} Free: {:<10} Available: {}",
        st.blocks, st.bfree, st.bavail
    )?;
    writeln!(out, "Max name length: {}", st.namelen)?;
    Ok(())
}

/// Result of one full traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: u64,
    pub files: u64,
}

/// Traverse everything under `root` `rounds` times, timing each round.
///
/// The first round populates the caches; later rounds show cache hits.
pub async fn walk(
    fs: &dyn VfsOps,
    root: &str,
    rounds: u32,
    out: &mut dyn Write,
) -> Result<WalkStats> {
    let mut last = WalkStats {
        directories: 0,
        files: 0,
    };
    for round in 1..=rounds.max(1) {
        let started = Instant::now();
        last = walk_once(fs, root, out, round == 1).await?;
        let elapsed = started.elapsed();
        writeln!(
            out,
            "round {round}: {} directories, {} files in {}",
            last.directories,
            last.files,
            millis(elapsed)
        )?;
    }
    Ok(last)
}

async fn walk_once(
    fs: &dyn VfsOps,
    root: &str,
    out: &mut dyn Write,
    print: bool,
) -> Result<WalkStats> {
    let mut stats = WalkStats {
        directories: 0,
        files: 0,
    };
    let mut pending = vec![root.trim_end_matches('/').to_string()];

    while let Some(dir) = pending.pop() {
        stats.directories += 1;
        let listing = fs.readdir(if dir.is_empty() { "/" } else { &dir }).await?;

        // Reverse so the stack pops children in listing order.
        for name in listing.iter().rev().filter(|n| *n != "." && *n != "..") {
            let child = format!("{dir}/{name}");
            let attr = fs.getattr(&child).await?;
            if attr.is_dir() {
                pending.push(child);
            } else {
                stats.files += 1;
                if print {
                    writeln!(out, "{child}  ({} bytes)", attr.size)?;
                }
            }
        }
    }
    Ok(stats)
}

fn millis(d: Duration) -> String {
    format!("{:.1} ms", d.as_secs_f64() * 1000.0)
}
