//! 交互式输入 - 行式的提问/应答协议

use std::io::{self, BufRead, Write};

/// 文本块的结束标记行
pub const END_SENTINEL: &str = "END";

/// 流程所需的用户输入来源
pub trait InputSource: Send {
    /// 初始的调研请求
    fn read_query(&mut self) -> io::Result<String>;

    /// 可选的公司上下文，未知时为空
    fn read_company(&mut self) -> io::Result<String>;

    /// 以`END`行结束的文本块，直接输入`END`表示沿用初始请求
    fn read_text_block(&mut self) -> io::Result<Vec<String>>;
}

/// 基于读写流的交互输入
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
    preset_query: Option<String>,
}

impl<R: BufRead + Send, W: Write + Send> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            preset_query: None,
        }
    }

    /// 预先给定初始请求，跳过第一次提问
    pub fn with_preset_query(mut self, query: Option<String>) -> Self {
        self.preset_query = query;
        self
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()
    }

    /// 读取一行并去掉行尾换行符；输入结束时返回None
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

impl<R: BufRead + Send, W: Write + Send> InputSource for ConsoleInput<R, W> {
    fn read_query(&mut self) -> io::Result<String> {
        if let Some(query) = self.preset_query.take() {
            self.say(&format!("You have entered -> {}", query))?;
            return Ok(query);
        }

        self.say("Tell me what do you want to do?")?;
        let query = self.read_line()?.unwrap_or_default();
        self.say(&format!("You have entered -> {}", query))?;
        Ok(query)
    }

    fn read_company(&mut self) -> io::Result<String> {
        self.say("Enter Company name, if any. If you do not know the company name, just press Enter")?;
        let company = self.read_line()?.unwrap_or_default();
        self.say(&format!("You have entered company -> {}", company))?;
        Ok(company.trim().to_string())
    }

    fn read_text_block(&mut self) -> io::Result<Vec<String>> {
        self.say("Now, enter the text, followed by END word in a new line")?;
        self.say("If you want to use the same text entered earlier, just type END and press Enter")?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line == END_SENTINEL {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }
}
