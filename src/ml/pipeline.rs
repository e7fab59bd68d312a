use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::series::Series;

/// Two-phase stage contract shared by every transformer.
///
/// `fit` learns parameters from a training table and replaces the stage's
/// learned state in one step; `transform` applies the frozen state to a
/// table and returns a new table, never mutating its input. The optional
/// target is accepted for pipeline compatibility; none of the current
/// stages consume it.
pub trait Transformer {
    /// Learn parameters from the training table
    fn fit(&mut self, df: &DataFrame, target: Option<&Series>) -> Result<()>;

    /// Apply the learned parameters to a table
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;

    /// Fit on the table, then transform it
    fn fit_transform(&mut self, df: &DataFrame, target: Option<&Series>) -> Result<DataFrame> {
        self.fit(df, target)?;
        self.transform(df)
    }

    /// Names of the columns this stage introduces
    fn feature_names_out(&self) -> Vec<String>;
}

/// A pipeline chaining transformer stages in a fixed sequence.
///
/// Stages communicate only through the column values they output; no stage
/// reads another stage's internal state.
#[derive(Default)]
pub struct Pipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Pipeline {
            transformers: Vec::new(),
        }
    }

    /// Append a transformer stage
    pub fn add_transformer<T: Transformer + 'static>(&mut self, transformer: T) -> &mut Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Whether the pipeline has no stages
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Run every fitted stage in sequence
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for transformer in &self.transformers {
            result = transformer.transform(&result)?;
        }
        Ok(result)
    }

    /// Fit each stage on the output of the previous stages
    pub fn fit(&mut self, df: &DataFrame, target: Option<&Series>) -> Result<()> {
        let mut current = df.clone();
        for (i, transformer) in self.transformers.iter_mut().enumerate() {
            log::debug!("fitting pipeline stage {}", i);
            transformer.fit(&current, target)?;
            current = transformer.transform(&current)?;
        }
        Ok(())
    }

    /// Fit the pipeline, then transform the table
    pub fn fit_transform(&mut self, df: &DataFrame, target: Option<&Series>) -> Result<DataFrame> {
        let mut result = df.clone();
        for transformer in &mut self.transformers {
            result = transformer.fit_transform(&result, target)?;
        }
        Ok(result)
    }
}
