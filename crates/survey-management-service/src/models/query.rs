//! 问卷列表查询参数
//!
//! 排序键、页码和搜索模式的解析都在进入 SQL 之前完成，
//! 非法输入统一转换为 `InvalidArgument`。

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SurveyError};

/// 每页条数
pub const PAGE_SIZE: i64 = 20;

/// 问卷排序方式
///
/// 查询参数中 `-` 前缀表示降序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionnaireSort {
    CreatedAt,
    CreatedAtDesc,
    Title,
    TitleDesc,
    ModifiedAt,
    ModifiedAtDesc,
}

impl QuestionnaireSort {
    /// 解析排序参数，空串表示不指定排序
    pub fn parse(sort: &str) -> Result<Option<Self>> {
        let parsed = match sort {
            "" => return Ok(None),
            "created_at" => Self::CreatedAt,
            "-created_at" => Self::CreatedAtDesc,
            "title" => Self::Title,
            "-title" => Self::TitleDesc,
            "modified_at" => Self::ModifiedAt,
            "-modified_at" => Self::ModifiedAtDesc,
            other => {
                return Err(SurveyError::invalid_argument(
                    "sort",
                    format!("invalid sort type '{}'", other),
                ));
            }
        };
        Ok(Some(parsed))
    }

    /// ORDER BY 子句（不含关键字本身），只会返回固定字面量
    pub fn order_clause(&self) -> &'static str {
        match self {
            Self::CreatedAt => "q.created_at ASC",
            Self::CreatedAtDesc => "q.created_at DESC",
            Self::Title => "q.title ASC",
            Self::TitleDesc => "q.title DESC",
            Self::ModifiedAt => "q.modified_at ASC",
            Self::ModifiedAtDesc => "q.modified_at DESC",
        }
    }

    /// 完整 ORDER BY 子句，以 id 作为稳定的次级排序保证翻页不重不漏
    pub fn order_by(sort: Option<Self>) -> String {
        match sort {
            Some(sort) => format!("ORDER BY {}, q.id ASC", sort.order_clause()),
            None => "ORDER BY q.id ASC".to_string(),
        }
    }
}

/// 页码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
}

impl PageRequest {
    /// 解析页码参数，空串视为第一页
    pub fn parse(page: &str) -> Result<Self> {
        if page.is_empty() {
            return Ok(Self { page: 1 });
        }

        let page: i64 = page.trim().parse().map_err(|_| {
            SurveyError::invalid_argument("page", format!("'{}' is not an integer", page))
        })?;
        Self::new(page)
    }

    pub fn new(page: i64) -> Result<Self> {
        if page <= 0 {
            return Err(SurveyError::invalid_argument(
                "page",
                "page must be a positive integer",
            ));
        }
        Ok(Self { page })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * PAGE_SIZE
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    /// 总条数对应的最大页码
    pub fn page_max(total: i64) -> i64 {
        (total + PAGE_SIZE - 1) / PAGE_SIZE
    }

    /// 校验页码落在结果范围内，返回最大页码
    ///
    /// 结果集为空或页码越界都视为 NotFound，不返回空页
    pub fn check_total(&self, total: i64) -> Result<i64> {
        if total == 0 {
            return Err(SurveyError::NotFound("questionnaires".to_string()));
        }

        let page_max = Self::page_max(total);
        if self.page > page_max {
            return Err(SurveyError::NotFound(format!(
                "page {} exceeds page max {}",
                self.page, page_max
            )));
        }
        Ok(page_max)
    }

    /// 截取内存中已排序结果的当前页
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.offset() as usize)
            .take(PAGE_SIZE as usize)
            .collect()
    }
}

/// 编译搜索模式
///
/// 以大小写不敏感模式编译，模式文本保持原样（`\D`、`\W` 等转义不受影响）；空串表示不过滤
pub fn compile_search(search: &str) -> Result<Option<Regex>> {
    if search.is_empty() {
        return Ok(None);
    }

    RegexBuilder::new(search)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| SurveyError::invalid_argument("search", format!("invalid regexp: {}", e)))
}

/// 标题是否匹配搜索模式
pub fn title_matches(regex: &Regex, title: &str) -> bool {
    regex.is_match(title)
}
