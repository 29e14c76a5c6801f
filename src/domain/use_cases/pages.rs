use crate::{
    entities::alumni::{Alumni, AlumniDirectoryContext, ExecutiveBoardContext},
    errors::AppError,
    repositories::alumni::AlumniRepository,
};

/// Read-only query compositions behind the public pages. Every call
/// recomputes from the store; there is no caching layer to go stale.
pub struct PagesHandler<R>
where
    R: AlumniRepository,
{
    pub alumni_repo: R,
}

impl<R> PagesHandler<R>
where
    R: AlumniRepository,
{
    pub fn new(alumni_repo: R) -> Self {
        PagesHandler { alumni_repo }
    }

    /// Current executive board, ordered by role code then name.
    pub async fn executive_board(&self) -> Result<ExecutiveBoardContext, AppError> {
        let execs = self.alumni_repo.current_executives().await?;
        let total_exec = execs.len() as i64;

        Ok(ExecutiveBoardContext {
            current_exec: execs.iter().map(Alumni::to_profile).collect(),
            total_exec,
        })
    }

    /// Directory split into featured and other alumni. Current executives
    /// are excluded from both partitions and from the total, so nobody is
    /// counted twice across the two pages.
    pub async fn alumni_directory(&self) -> Result<AlumniDirectoryContext, AppError> {
        let featured = self.alumni_repo.featured_alumni().await?;
        let other = self.alumni_repo.other_alumni().await?;
        let total_alumni = self.alumni_repo.count_non_exec().await?;

        Ok(AlumniDirectoryContext {
            featured_alumni: featured.iter().map(Alumni::to_profile).collect(),
            other_alumni: other.iter().map(Alumni::to_profile).collect(),
            total_alumni,
        })
    }
}
