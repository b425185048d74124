//! Command system tying the queue, the session and the renderers together
//!
//! A [`Plotter`] is fed directives (command-line tokens or directives built in
//! code), then [`Plotter::process`] drains the queue into the session, renders
//! every selected file and resets itself for the next batch.

use crate::command::{self, CommandQueue, Directive};
use crate::error::Result;
use crate::processor::{self, Rendered};
use crate::state::Session;

#[derive(Debug, Default)]
pub struct Plotter {
    session: Session,
    queue: CommandQueue,
}

impl Plotter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse command-line tokens and append them to the command queue
    pub fn parse_arguments<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let directives = command::parse_arguments(args)?;
        self.queue.extend(directives);
        Ok(())
    }

    /// Append one directive to the command queue
    pub fn push(&mut self, directive: Directive) {
        self.queue.push(directive);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Number of directives waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Execute every queued directive, expanding configuration files in place
    pub fn run_command_queue(&mut self) -> Result<()> {
        while let Some(directive) = self.queue.next_directive()? {
            self.session.execute(&directive)?;
        }
        Ok(())
    }

    /// Render every queued file with the configured modes
    pub fn process_file_queue(&mut self) -> Result<Vec<Rendered>> {
        processor::process_files(&mut self.session)
    }

    /// Run the whole batch, then clear all state so the plotter can be reused
    pub fn process(&mut self) -> Result<Vec<Rendered>> {
        let result = self
            .run_command_queue()
            .and_then(|_| self.process_file_queue());
        self.clear();
        result
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Argument, DirectiveKind};
    use crate::data::{DataSource, stats};
    use crate::error::ReportError;
    use crate::render::{OutputMode, excel};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    const ML_HEADER: &str = "event_id,num_nodes,7_num_edges_bg,\
        metric_learning_time,metric_learning_gpu_time,build_graph_time,build_graph_gpu_time,\
        filtering_time,filtering_gpu_time,preprocess_time,preprocess_gpu_time,\
        gnn_time,gnn_gpu_time,cc_time,cc_gpu_time,total_event,total_event_gpu";

    fn write_ml_table(path: &Path) {
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{ML_HEADER}").unwrap();
        writeln!(file, "0,100,400,1,0.5,2,1,3,1.5,4,2,5,2.5,6,3,21,10.5").unwrap();
        writeln!(file, "1,200,900,3,1.5,4,3,5,2.5,6,4,7,3.5,8,5,33,20").unwrap();
        writeln!(file, "2,300,1300,2,1,3,2,4,2,5,3,6,3,7,4,27,15").unwrap();
        writeln!(file, "mean,200,866.67,2,1,3,2,4,2,5,3,6,3,7,4,27,15.1667").unwrap();
        writeln!(file, "std,100,450.92,1,0.5,1,1,1,0.5,1,1,1,0.5,1,1,6,4.7523").unwrap();
    }

    fn arg(path: &Path) -> String {
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn excel_output_writes_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("timing_ml.csv");
        write_ml_table(&input);
        let out = format!("{}/out/", dir.path().display());

        let mut plotter = Plotter::new();
        plotter
            .parse_arguments([
                "--outdir".to_string(),
                out.clone(),
                "--output".to_string(),
                "excel".to_string(),
                arg(&input),
            ])
            .unwrap();
        assert_eq!(plotter.pending(), 3);

        let rendered = plotter.process().unwrap();
        assert_eq!(
            rendered,
            vec![Rendered {
                path: input.clone(),
                mode: OutputMode::Excel
            }]
        );
        assert!(PathBuf::from(format!("{out}timing_ml.xlsx")).is_file());

        let source = DataSource::load(&input).unwrap();
        let summary = stats::stage_summary(&source).unwrap();
        assert_eq!(
            excel::sheet_rows(&summary),
            vec![
                ["Stage", "Wall_Time", "GPU_Time"],
                ["Metric Learning", "2.0000 ± 1.0000", "1.0000 ± 0.5000"],
                ["Build Graph", "3.0000 ± 1.0000", "2.0000 ± 1.0000"],
                ["Filtering", "4.0000 ± 1.0000", "2.0000 ± 0.5000"],
                ["Preprocess", "5.0000 ± 1.0000", "3.0000 ± 1.0000"],
                ["InteractionGNN", "6.0000 ± 1.0000", "3.0000 ± 0.5000"],
                ["ccInfer", "7.0000 ± 1.0000", "4.0000 ± 1.0000"],
                ["Total", "27.0000 ± 6.0000", "15.1667 ± 4.7523"],
            ]
        );

        // everything is reset for the next batch
        assert_eq!(plotter.pending(), 0);
        assert!(plotter.session().input_files.is_empty());
        assert!(plotter.session().output_modes.is_empty());
    }

    #[test]
    fn default_mode_prints_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("timing_ml.csv");
        write_ml_table(&input);

        let mut plotter = Plotter::new();
        plotter.parse_arguments([arg(&input), arg(&input)]).unwrap();
        let rendered = plotter.process().unwrap();
        assert_eq!(
            rendered,
            vec![Rendered {
                path: input,
                mode: OutputMode::Print
            }]
        );
    }

    #[test]
    fn rule_overrides_mode_and_leaks_into_general_pass() {
        let dir = tempfile::tempdir().unwrap();
        let matched = dir.path().join("run_mem_ml.csv");
        let plain = dir.path().join("run_ml.csv");
        write_ml_table(&matched);
        write_ml_table(&plain);
        let out = format!("{}/", dir.path().display());

        let mut plotter = Plotter::new();
        plotter
            .parse_arguments([
                "--outdir".to_string(),
                out,
                "--output".to_string(),
                "print".to_string(),
                "--regex".to_string(),
                "mem = output(excel)".to_string(),
                "--dir".to_string(),
                arg(dir.path()),
            ])
            .unwrap();
        let rendered = plotter.process().unwrap();

        let modes_of = |path: &Path| -> Vec<OutputMode> {
            rendered
                .iter()
                .filter(|r| r.path == path)
                .map(|r| r.mode)
                .collect()
        };
        assert_eq!(modes_of(&matched), vec![OutputMode::Excel]);
        assert_eq!(modes_of(&plain), vec![OutputMode::Print, OutputMode::Excel]);
        assert_eq!(rendered[0].path, matched);
    }

    #[test]
    fn memory_rule_writes_memory_plots_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("run_mem_01_ml.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "{ML_HEADER},peak_memory").unwrap();
        writeln!(file, "0,100,400,1,0.5,2,1,3,1.5,4,2,5,2.5,6,3,21,10.5,512").unwrap();
        writeln!(file, "1,200,900,3,1.5,4,3,5,2.5,6,4,7,3.5,8,5,33,20,1100").unwrap();
        writeln!(file, "2,300,1300,2,1,3,2,4,2,5,3,6,3,7,4,27,15,1900").unwrap();
        writeln!(file, "3,400,1800,2,1,3,2,4,2,5,3,6,3,7,4,27,15,2700").unwrap();
        writeln!(file, "mean,250,1100,2,1,3,2,4,2,5,3,6,3,7,4,27,15,1553").unwrap();
        writeln!(file, "std,129,600,1,0.5,1,1,1,0.5,1,1,1,0.5,1,1,6,4,950").unwrap();
        drop(file);
        let out = format!("{}/plots/", dir.path().display());

        let mut plotter = Plotter::new();
        plotter
            .parse_arguments([
                "--outdir".to_string(),
                out.clone(),
                "--regex".to_string(),
                "mem = output(png_mem)".to_string(),
                arg(&input),
            ])
            .unwrap();
        let rendered = plotter.process().unwrap();
        assert_eq!(
            rendered,
            vec![Rendered {
                path: input,
                mode: OutputMode::PngMem
            }]
        );

        let mut written: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        assert_eq!(
            written,
            vec![
                "run_mem_01_ml_mem_vs_edges_l.png",
                "run_mem_01_ml_mem_vs_edges_q.png",
                "run_mem_01_ml_mem_vs_nodes_l.png",
                "run_mem_01_ml_mem_vs_nodes_q.png",
            ]
        );
    }

    #[test]
    fn file_without_stage_marker_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("timing.csv");
        write_ml_table(&input);

        let mut plotter = Plotter::new();
        plotter.parse_arguments([arg(&input)]).unwrap();
        assert!(matches!(
            plotter.process(),
            Err(ReportError::MissingRequiredColumn { .. })
        ));
        assert_eq!(plotter.pending(), 0);
    }

    #[test]
    fn yaml_configuration_expands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("timing_ml.csv");
        write_ml_table(&input);
        let config = dir.path().join("report.yaml");
        std::fs::write(
            &config,
            format!(
                "indir: {}/\nfile: timing_ml.csv\noutput: [print, excel]\noutdir: {}/xlsx/\n",
                dir.path().display(),
                dir.path().display()
            ),
        )
        .unwrap();

        let mut plotter = Plotter::new();
        plotter.push(Directive::option(DirectiveKind::Output, "print"));
        plotter.push(Directive::option(DirectiveKind::Yaml, arg(&config).as_str()));
        plotter.run_command_queue().unwrap();

        let session = plotter.session();
        assert_eq!(session.output_modes, vec![OutputMode::Print, OutputMode::Excel]);
        assert_eq!(session.input_files, vec![PathBuf::from(format!("{}/timing_ml.csv", dir.path().display()))]);
        assert!(dir.path().join("xlsx").is_dir());

        let rendered = plotter.process_file_queue().unwrap();
        assert_eq!(rendered.len(), 2);
        assert!(dir.path().join("xlsx").join("timing_ml.xlsx").is_file());
    }

    #[test]
    fn directive_errors_abort_the_batch() {
        let mut plotter = Plotter::new();
        plotter.push(Directive::option(DirectiveKind::Output, "print"));
        plotter.push(Directive::Option {
            kind: DirectiveKind::Output,
            argument: Some(Argument::from("svg")),
        });
        assert!(matches!(
            plotter.process(),
            Err(ReportError::UnknownOutputMode { .. })
        ));
        assert!(plotter.session().output_modes.is_empty());
    }
}
