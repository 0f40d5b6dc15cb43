use crate::generator::context::GeneratorContext;
use crate::types::report::Report;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 保存报告：配置了输出目录时写入磁盘，否则直接输出到终端
pub async fn save(context: &GeneratorContext, report: &Report) -> Result<()> {
    match &context.config.output_path {
        Some(output_dir) => DiskOutlet::new(output_dir).save(report).await.map(|_| ()),
        None => ConsoleOutlet.save(report).await.map(|_| ()),
    }
}

pub trait Outlet {
    /// 返回报告写入的位置（如果有）
    async fn save(&self, report: &Report) -> Result<Option<PathBuf>>;
}

pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// `<公司名>-<模式>.md`，公司名中的非字母数字字符替换为 `-`
    pub fn file_name(report: &Report) -> String {
        let slug: String = report
            .company_name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}-{}.md", slug, report.mode)
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, report: &Report) -> Result<Option<PathBuf>> {
        println!("\n🖊️ 报告存储中...");
        fs::create_dir_all(&self.output_dir).context(format!(
            "Failed to create output directory: {:?}",
            self.output_dir
        ))?;

        let output_file_path = self.output_dir.join(Self::file_name(report));
        fs::write(&output_file_path, &report.body).context(format!(
            "Failed to write report: {:?}",
            output_file_path
        ))?;

        println!("💾 已保存报告: {}", output_file_path.display());
        Ok(Some(output_file_path))
    }
}

pub struct ConsoleOutlet;

impl Outlet for ConsoleOutlet {
    async fn save(&self, report: &Report) -> Result<Option<PathBuf>> {
        println!("\n{}\n", report.body);
        Ok(None)
    }
}
