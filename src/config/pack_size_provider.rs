// ==========================================
// 订单装箱规划 - 包装规格读写 Trait
// ==========================================
// 职责: 定义求解服务所需的规格存取接口
// 实现者:
//   - PackSizeRepository（SQLite pack_size 表）
//   - InMemoryPackSizeProvider（测试 / 嵌入场景）
// 红线: 不包含规格校验，校验由 API 层完成
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::pack_size_repo::PackSizeRepository;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::RwLock;

// ==========================================
// PackSizeProvider Trait
// ==========================================
#[async_trait]
pub trait PackSizeProvider: Send + Sync {
    /// 读取当前规格（升序、无重复）
    async fn read(&self) -> RepositoryResult<Vec<u64>>;

    /// 整体替换
    async fn write(&self, sizes: &[u64]) -> RepositoryResult<()>;

    /// 合并写入（并集）
    async fn merge(&self, sizes: &[u64]) -> RepositoryResult<()>;

    /// 删除单个规格（不存在时视为成功）
    async fn delete(&self, size: u64) -> RepositoryResult<()>;
}

// ==========================================
// SQLite 实现
// ==========================================
#[async_trait]
impl PackSizeProvider for PackSizeRepository {
    async fn read(&self) -> RepositoryResult<Vec<u64>> {
        self.list()
    }

    async fn write(&self, sizes: &[u64]) -> RepositoryResult<()> {
        self.replace_all(sizes).map(|_| ())
    }

    async fn merge(&self, sizes: &[u64]) -> RepositoryResult<()> {
        PackSizeRepository::merge(self, sizes).map(|_| ())
    }

    async fn delete(&self, size: u64) -> RepositoryResult<()> {
        let removed = PackSizeRepository::delete(self, size)?;
        if !removed {
            tracing::debug!(size, "删除的规格不存在，忽略");
        }
        Ok(())
    }
}

// ==========================================
// InMemoryPackSizeProvider - 内存实现
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryPackSizeProvider {
    sizes: RwLock<BTreeSet<u64>>,
}

impl InMemoryPackSizeProvider {
    pub fn new(initial: &[u64]) -> Self {
        Self {
            sizes: RwLock::new(initial.iter().copied().collect()),
        }
    }

    fn lock_error<E: std::fmt::Display>(e: E) -> RepositoryError {
        RepositoryError::LockError(e.to_string())
    }
}

#[async_trait]
impl PackSizeProvider for InMemoryPackSizeProvider {
    async fn read(&self) -> RepositoryResult<Vec<u64>> {
        let guard = self.sizes.read().map_err(Self::lock_error)?;
        Ok(guard.iter().copied().collect())
    }

    async fn write(&self, sizes: &[u64]) -> RepositoryResult<()> {
        let mut guard = self.sizes.write().map_err(Self::lock_error)?;
        *guard = sizes.iter().copied().collect();
        Ok(())
    }

    async fn merge(&self, sizes: &[u64]) -> RepositoryResult<()> {
        let mut guard = self.sizes.write().map_err(Self::lock_error)?;
        guard.extend(sizes.iter().copied());
        Ok(())
    }

    async fn delete(&self, size: u64) -> RepositoryResult<()> {
        let mut guard = self.sizes.write().map_err(Self::lock_error)?;
        guard.remove(&size);
        Ok(())
    }
}
