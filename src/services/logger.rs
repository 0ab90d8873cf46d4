//! 应用日志器
//!
//! 处理器由配置决定：`log.email` 加一个告警处理器，`log.file` 加一个文件处理器，
//! 两者都没有时日志器不带任何处理器，只转发到 `tracing`。

use chrono::Local;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

use crate::config::LogConfig;
use crate::errors::ServiceError;

pub const ALERT_SENDER: &str = "no-reply@vates.fr";
pub const ALERT_SUBJECT: &str = "[XO Web]";

/// 日志处理器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogHandler {
    /// 缓冲所有记录，直到出现不低于 `threshold` 的记录才整体发出告警邮件
    Alert {
        to: String,
        from: &'static str,
        subject: &'static str,
        threshold: Level,
    },
    /// 追加写入文件
    File { path: PathBuf },
}

/// 待发送的告警邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMail {
    pub to: String,
    pub from: &'static str,
    pub subject: &'static str,
    pub body: String,
}

#[derive(Debug)]
pub struct Logger {
    name: String,
    handlers: Vec<LogHandler>,
    buffer: Mutex<Vec<String>>,
    outbox: Mutex<Vec<AlertMail>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
            buffer: Mutex::new(Vec::new()),
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// 按配置构建名为 `main` 的日志器
    pub fn from_config(config: &LogConfig) -> Self {
        let mut logger = Self::new("main");
        if let Some(email) = config.email.as_ref().filter(|e| !e.is_empty()) {
            logger.push_handler(LogHandler::Alert {
                to: email.clone(),
                from: ALERT_SENDER,
                subject: ALERT_SUBJECT,
                threshold: Level::WARN,
            });
        }
        if let Some(file) = config.file.as_ref().filter(|f| !f.as_os_str().is_empty()) {
            logger.push_handler(LogHandler::File { path: file.clone() });
        }
        logger
    }

    pub fn push_handler(&mut self, handler: LogHandler) {
        self.handlers.push(handler);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handlers(&self) -> &[LogHandler] {
        &self.handlers
    }

    /// 记录一条日志
    pub fn log(&self, level: Level, message: &str) -> Result<(), ServiceError> {
        if level == Level::ERROR {
            tracing::error!(logger = %self.name, "{message}");
        } else if level == Level::WARN {
            tracing::warn!(logger = %self.name, "{message}");
        } else if level == Level::INFO {
            tracing::info!(logger = %self.name, "{message}");
        } else {
            tracing::debug!(logger = %self.name, "{message}");
        }

        let line = format!(
            "[{}] {}.{}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.name,
            level,
            message
        );

        for handler in &self.handlers {
            match handler {
                LogHandler::Alert {
                    to,
                    from,
                    subject,
                    threshold,
                } => {
                    let mut buffer = self.buffer.lock();
                    buffer.push(line.clone());
                    // tracing 的 Level 越严重越小
                    if level <= *threshold {
                        let body = buffer.drain(..).collect::<Vec<_>>().join("\n");
                        self.outbox.lock().push(AlertMail {
                            to: to.clone(),
                            from: *from,
                            subject: *subject,
                            body,
                        });
                    }
                }
                LogHandler::File { path } => {
                    let mut file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map_err(|e| ServiceError::IO(format!("opening {}", path.display()), e))?;
                    writeln!(file, "{line}")
                        .map_err(|e| ServiceError::IO(format!("writing {}", path.display()), e))?;
                }
            }
        }
        Ok(())
    }

    pub fn warning(&self, message: &str) -> Result<(), ServiceError> {
        self.log(Level::WARN, message)
    }

    pub fn error(&self, message: &str) -> Result<(), ServiceError> {
        self.log(Level::ERROR, message)
    }

    /// 取出已触发的告警邮件（投递由外部负责）
    pub fn take_alerts(&self) -> Vec<AlertMail> {
        std::mem::take(&mut *self.outbox.lock())
    }
}

/// 把错误及其来源链写入日志器
#[derive(Debug, Clone)]
pub struct ErrorLogger {
    logger: Arc<Logger>,
}

impl ErrorLogger {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn report(&self, error: &dyn std::error::Error) -> Result<(), ServiceError> {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        self.logger.error(&message)
    }
}
