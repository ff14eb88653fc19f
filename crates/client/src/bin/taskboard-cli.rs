use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use taskboard_client::{
    board::{fill_form, is_affirmative, parse_status, read_answer, set_edit_field, task_at},
    Answer, BoardView, ClientError, Confirm, FilterPreference, TaskClient, BOARD_HELP,
    DEFAULT_FILTER_FILE, DELETE_PROMPT,
};
use taskboard_core::{init_logging, LogFormat};
use taskboard_domain::{StatusFilter, Task, TaskDraft, TaskPatch, TaskStatus};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliApp::parse();
    init_logging(&cli.log_level, LogFormat::Compact)?;
    cli.run().await
}

/// 任务看板命令行客户端
#[derive(Parser, Debug)]
#[command(name = "taskboard-cli")]
#[command(version)]
#[command(about = "任务看板 - 命令行客户端")]
struct CliApp {
    #[command(subcommand)]
    command: Commands,

    /// API服务器基础URL
    #[arg(long, env = "TASKBOARD_API_URL", default_value = "http://localhost:4000")]
    api_url: String,

    /// 保存过滤条件的文件
    #[arg(long, default_value = DEFAULT_FILTER_FILE)]
    filter_file: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出任务，未指定状态时使用保存的过滤条件
    List {
        /// all | pending | in-progress | done
        #[arg(short, long)]
        status: Option<StatusFilter>,
    },
    /// 查看任务详情
    Get {
        /// 任务ID
        task_id: String,
    },
    /// 创建新任务
    Create {
        /// 任务标题
        #[arg(short, long)]
        title: String,
        /// 任务描述
        #[arg(short, long)]
        description: Option<String>,
        /// 初始状态
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// 更新任务，只发送指定的字段
    Update {
        /// 任务ID
        task_id: String,
        /// 新的标题
        #[arg(short, long)]
        title: Option<String>,
        /// 新的描述
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// 清空描述
        #[arg(long)]
        clear_description: bool,
        /// 新的状态
        #[arg(short, long)]
        status: Option<TaskStatus>,
    },
    /// 删除任务
    Delete {
        /// 任务ID
        task_id: String,
        /// 强制删除 (不询问确认)
        #[arg(short, long)]
        force: bool,
    },
    /// 交互式看板
    Board,
}

impl CliApp {
    async fn run(self) -> Result<()> {
        let client = TaskClient::new(&self.api_url);
        let preference = FilterPreference::new(&self.filter_file);

        match self.command {
            Commands::List { status } => {
                let filter = status.unwrap_or_else(|| preference.load());
                let tasks = client.list(filter).await.context("获取任务列表失败")?;
                print_tasks_table(&tasks);
            }
            Commands::Get { task_id } => {
                let task = client.get(&task_id).await.context("获取任务失败")?;
                print_task_details(&task);
            }
            Commands::Create {
                title,
                description,
                status,
            } => {
                let mut draft = TaskDraft::new(title);
                if let Some(description) = description {
                    draft = draft.with_description(description);
                }
                if let Some(status) = status {
                    draft = draft.with_status(status);
                }
                let task = client.create(&draft).await.context("创建任务失败")?;
                println!("任务创建成功!");
                print_task_details(&task);
            }
            Commands::Update {
                task_id,
                title,
                description,
                clear_description,
                status,
            } => {
                let mut patch = TaskPatch::default();
                if let Some(title) = title {
                    patch = patch.title(title);
                }
                if let Some(description) = description {
                    patch = patch.description(description);
                }
                if clear_description {
                    patch = patch.clear_description();
                }
                if let Some(status) = status {
                    patch = patch.status(status);
                }
                let task = client.update(&task_id, &patch).await.context("更新任务失败")?;
                println!("任务更新成功!");
                print_task_details(&task);
            }
            Commands::Delete { task_id, force } => {
                if !force && !StdinConfirm.confirm(&format!("确定要删除任务 {task_id} 吗?")) {
                    println!("已取消删除操作");
                    return Ok(());
                }
                client.delete(&task_id).await.context("删除任务失败")?;
                println!("任务删除成功: {task_id}");
            }
            Commands::Board => run_board(client, preference).await?,
        }

        Ok(())
    }
}

/// 一次性命令使用的终端 y/N 确认，看板模式下不使用
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} (y/N) ");
        let _ = std::io::stdout().flush();
        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        is_affirmative(&input)
    }
}

async fn run_board(client: TaskClient, preference: FilterPreference) -> Result<()> {
    let mut view = BoardView::open(client, preference).await;
    println!("{}", view.render());
    println!("{BOARD_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await.context("读取输入失败")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));
        let argument = argument.trim();

        let outcome = match command {
            "quit" | "exit" => break,
            "help" => {
                println!("{BOARD_HELP}");
                continue;
            }
            "title" => {
                view.form.title = argument.to_string();
                Ok(())
            }
            "desc" => {
                view.form.description = argument.to_string();
                Ok(())
            }
            "status" => parse_status(argument).map(|status| view.form.status = status),
            "add" => match fill_form(&mut view.form, argument) {
                Ok(()) => view.submit_form().await.map(|_| ()),
                Err(err) => Err(err),
            },
            "filter" => match argument.parse::<StatusFilter>() {
                Ok(filter) => view.set_filter(filter).await,
                Err(err) => Err(ClientError::Validation(err.user_message())),
            },
            "edit" => task_at(view.tasks(), argument).map(|id| {
                view.start_edit(id);
            }),
            "set" => set_edit_field(view.editing_mut(), argument),
            "save" => view.save_edit().await.map(|_| ()),
            "cancel" => {
                view.cancel_edit();
                Ok(())
            }
            "delete" => match task_at(view.tasks(), argument) {
                Ok(id) => {
                    print!("{DELETE_PROMPT} (y/N) ");
                    let _ = std::io::stdout().flush();
                    let answer = read_answer(&mut lines).await.context("读取输入失败")?;
                    match view.delete(id, &Answer(answer)).await {
                        Ok(false) => {
                            println!("已取消删除操作");
                            Ok(())
                        }
                        Ok(true) => Ok(()),
                        Err(err) => Err(err),
                    }
                }
                Err(err) => Err(err),
            },
            "refresh" => view.refresh().await,
            other => Err(ClientError::Validation(format!("未知命令: {other}"))),
        };

        println!("{}", view.render());
        if let Err(err) = outcome {
            println!("错误: {err}");
        }
    }

    Ok(())
}

fn print_tasks_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", taskboard_client::EMPTY_MESSAGE);
        return;
    }
    println!("{:<36} {:<16} {:<25} {:<30}", "ID", "状态", "创建时间", "标题");
    println!("{}", "-".repeat(110));
    for task in tasks {
        println!(
            "{:<36} {:<16} {:<25} {:<30}",
            task.id,
            task.status.label(),
            task.created_at.format("%Y-%m-%d %H:%M:%S"),
            task.title
        );
    }
}

fn print_task_details(task: &Task) {
    println!("任务详情:");
    println!("  ID: {}", task.id);
    println!("  标题: {}", task.title);
    if task.has_description() {
        println!("  描述: {}", task.description);
    }
    println!("  状态: {}", task.status.label());
    println!("  创建时间: {}", task.created_at.to_rfc3339());
    println!("  更新时间: {}", task.updated_at.to_rfc3339());
}
