use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;
use crate::runner::RunResults;
use crate::store::model::StoredResult;

/// JSONL 结果存储：`<connection>/<collection>.jsonl`
pub struct ResultStore {
    file_path: PathBuf,
}

impl ResultStore {
    /// 打开存储，目录不存在时创建
    pub fn open(connection: &Path, collection: &str) -> Result<Self> {
        let store = Self::locate(connection, collection);
        store.ensure_dir()?;
        Ok(store)
    }

    /// 只定位文件，不创建目录
    pub fn locate(connection: &Path, collection: &str) -> Self {
        Self::new_with_path(connection.join(format!("{}.jsonl", collection)))
    }

    /// 指定文件路径（测试用）
    pub fn new_with_path(path: PathBuf) -> Self {
        Self { file_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// 追加一轮执行的全部结果，返回写入条数
    ///
    /// 整轮在一次排他锁内写完，多个进程同时写入时不会交错。
    pub fn append_run(&self, results: &RunResults) -> Result<usize> {
        let run_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now();

        let mut entries: Vec<StoredResult> = results
            .single
            .iter()
            .map(|r| StoredResult::from_result(r, &run_id, None, timestamp))
            .collect();
        for group in &results.group {
            entries.extend(
                group
                    .tasks
                    .iter()
                    .map(|r| StoredResult::from_result(r, &run_id, Some(&group.name), timestamp)),
            );
        }

        self.append_all(&entries)?;
        debug!(run_id = %run_id, count = entries.len(), "results stored");
        Ok(entries.len())
    }

    fn append_all(&self, entries: &[StoredResult]) -> Result<()> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        file.lock_exclusive()?;

        let mut writer = BufWriter::new(&file);
        for entry in entries {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;

        // 文件关闭时释放锁
        Ok(())
    }

    /// 读取全部记录，按写入顺序
    pub fn list(&self) -> Result<Vec<StoredResult>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.file_path)?;
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredResult>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(path = %self.file_path.display(), error = %e, "skipping corrupt line"),
            }
        }

        Ok(entries)
    }

    /// 最近 n 条记录，从旧到新
    pub fn tail(&self, n: usize) -> Result<Vec<StoredResult>> {
        let entries = self.list()?;
        let skip = entries.len().saturating_sub(n);
        Ok(entries.into_iter().skip(skip).collect())
    }
}
