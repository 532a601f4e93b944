use crate::errors;
use crate::model::{ChartSeries, MetricsDocument};
use crate::query::{resolve_source, DataSource, QueryContext, UrlTemplate};
use crate::series;

pub trait ChartView {
    fn id(&self) -> &'static str;
    fn title(&self) -> &'static str;

    /// Where the chart's document comes from for the given cluster, host and window.
    fn source(&self, ctx: &QueryContext) -> errors::Result<DataSource>;

    fn transform_to_series(&self, doc: Option<&MetricsDocument>)
        -> errors::Result<Vec<ChartSeries>>;
}

pub const PROCESSES_URL: UrlTemplate = UrlTemplate(
    "/api/clusters/{clusterName}/hosts/{hostName}?fields=\
     metrics/processes/proc_total[{fromSeconds},{toSeconds},{stepSeconds}],\
     metrics/processes/proc_run[{fromSeconds},{toSeconds},{stepSeconds}]",
);

pub const PROCESSES_FIXTURE: &str = "/data/hosts/metrics/processes.json";

/// Host process counts: total and running.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProcessesChart;

impl ChartView for HostProcessesChart {
    fn id(&self) -> &'static str {
        "host-metrics-processes"
    }

    fn title(&self) -> &'static str {
        "Processes"
    }

    fn source(&self, ctx: &QueryContext) -> errors::Result<DataSource> {
        resolve_source(PROCESSES_URL, PROCESSES_FIXTURE, ctx)
    }

    fn transform_to_series(
        &self,
        doc: Option<&MetricsDocument>,
    ) -> errors::Result<Vec<ChartSeries>> {
        series::transform_to_series(doc)
    }
}
