//! User-facing text in the two supported scripts.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Traditional Chinese (Hong Kong)
    #[default]
    ZhHant,
    /// Simplified Chinese
    ZhHans,
}

impl Locale {
    pub fn html_lang(self) -> &'static str {
        match self {
            Locale::ZhHant => "zh-HK",
            Locale::ZhHans => "zh-CN",
        }
    }

    pub fn saved(self) -> &'static str {
        match self {
            Locale::ZhHant => "行程已成功儲存！",
            Locale::ZhHans => "行程已成功储存！",
        }
    }

    pub fn restored(self) -> &'static str {
        match self {
            Locale::ZhHant => "備份已成功還原！",
            Locale::ZhHans => "备份已成功还原！",
        }
    }

    pub fn backup_not_found(self) -> &'static str {
        match self {
            Locale::ZhHant => "找不到該備份",
            Locale::ZhHans => "找不到该备份",
        }
    }

    pub fn bad_request(self) -> &'static str {
        match self {
            Locale::ZhHant => "請求格式錯誤",
            Locale::ZhHans => "请求格式错误",
        }
    }

    pub fn ip_locked(self, hours: i64, minutes: i64) -> String {
        match self {
            Locale::ZhHant => format!("此 IP 已被鎖定。請在 {hours} 小時 {minutes} 分鐘後再試。"),
            Locale::ZhHans => format!("此 IP 已被锁定。请在 {hours} 小时 {minutes} 分钟后再试。"),
        }
    }

    pub fn too_many_attempts(self, lockout_hours: u64) -> String {
        match self {
            Locale::ZhHant => format!("密碼錯誤次數過多。您的 IP 已被鎖定 {lockout_hours} 小時。"),
            Locale::ZhHans => format!("密码错误次数过多。您的 IP 已被锁定 {lockout_hours} 小时。"),
        }
    }

    pub fn wrong_password(self, remaining_attempts: u32) -> String {
        match self {
            Locale::ZhHant => format!("密碼錯誤，您還有 {remaining_attempts} 次嘗試機會。"),
            Locale::ZhHans => format!("密码错误，您还有 {remaining_attempts} 次尝试机会。"),
        }
    }

    pub fn not_found_title(self) -> &'static str {
        match self {
            Locale::ZhHant => "頁面不存在",
            Locale::ZhHans => "页面不存在",
        }
    }

    pub fn not_found_heading(self) -> &'static str {
        match self {
            Locale::ZhHant => "404 - 找不到頁面",
            Locale::ZhHans => "404 - 找不到页面",
        }
    }

    pub fn not_found_hint(self) -> &'static str {
        match self {
            Locale::ZhHant => "請檢查您的網址是否正確。",
            Locale::ZhHans => "请检查您的网址是否正确。",
        }
    }
}
