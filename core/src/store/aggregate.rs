use super::InsightsStore;
use crate::{
    aggregation::spec::{AggregateRow, AggregateSpec, DimValue, RowOrder},
    error::{InsightsError, InsightsResult},
};
use rusqlite::{params_from_iter, types::Value};

/// SQL text plus positional bind values. The text never contains a value.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledQuery {
    pub fn from_spec(spec: &AggregateSpec) -> InsightsResult<Self> {
        let table = spec.fact.table_name();

        let mut group_cols = Vec::with_capacity(spec.group_by.len());
        for dimension in &spec.group_by {
            let col = spec.fact.dimension_column(*dimension).ok_or(
                InsightsError::UnsupportedDimension {
                    table,
                    dimension: dimension.name(),
                },
            )?;
            group_cols.push(col);
        }

        let mut select: Vec<String> = group_cols.iter().map(|c| c.to_string()).collect();
        for (i, measure) in spec.measures.iter().enumerate() {
            let col = spec.fact.measure_column(*measure).ok_or(
                InsightsError::UnsupportedDimension {
                    table,
                    dimension: measure.name(),
                },
            )?;
            select.push(format!("COALESCE(SUM({col}), 0) AS m{i}"));
        }
        if spec.measures.is_empty() {
            return Err(anyhow::anyhow!("aggregate on {table} has no measures").into());
        }

        let mut clauses = Vec::new();
        let mut params = Vec::new();
        if let Some(year) = spec.filter.year {
            clauses.push("year = ?");
            params.push(Value::Integer(i64::from(year)));
        }
        if let Some(quarter) = spec.filter.quarter {
            clauses.push("quarter = ?");
            params.push(Value::Integer(i64::from(quarter.get())));
        }
        if let Some(region) = spec.filter.region.name() {
            clauses.push("region = ?");
            params.push(Value::Text(region.to_string()));
        }

        let mut sql = format!("SELECT {} FROM {table}", select.join(", "));
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if !group_cols.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_cols.join(", "));
        }

        let key_order: Vec<String> = group_cols.iter().map(|c| format!("{c} ASC")).collect();
        match spec.order {
            RowOrder::Unordered => {}
            RowOrder::GroupAscending => {
                if !key_order.is_empty() {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&key_order.join(", "));
                }
            }
            RowOrder::MeasureDescending(idx) => {
                if idx >= spec.measures.len() {
                    return Err(anyhow::anyhow!(
                        "order measure {idx} out of range for {}",
                        spec.shape()
                    )
                    .into());
                }
                let mut order = vec![format!("m{idx} DESC")];
                order.extend(key_order);
                sql.push_str(" ORDER BY ");
                sql.push_str(&order.join(", "));
            }
        }

        if let Some(limit) = spec.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(limit as i64));
        }

        Ok(Self { sql, params })
    }
}

impl InsightsStore {
    pub fn compile(&self, spec: &AggregateSpec) -> InsightsResult<CompiledQuery> {
        CompiledQuery::from_spec(spec)
    }

    /// Run one grouped aggregation. An empty result is not an error.
    pub fn aggregate(&self, spec: &AggregateSpec) -> InsightsResult<Vec<AggregateRow>> {
        let compiled = self.compile(spec)?;
        log::debug!("aggregate {}: {}", spec.shape(), compiled.sql);

        let n_dims = spec.group_by.len();
        let n_measures = spec.measures.len();
        let mut stmt = self.conn.prepare_cached(&compiled.sql)?;
        let rows = stmt.query_map(params_from_iter(compiled.params.iter()), |row| {
            let mut dims = Vec::with_capacity(n_dims);
            for i in 0..n_dims {
                dims.push(match row.get::<_, Value>(i)? {
                    Value::Integer(v) => DimValue::Int(v),
                    Value::Real(v)    => DimValue::Int(v as i64),
                    Value::Text(s)    => DimValue::Text(s),
                    Value::Null | Value::Blob(_) => DimValue::Text(String::new()),
                });
            }
            let mut measures = Vec::with_capacity(n_measures);
            for j in 0..n_measures {
                measures.push(row.get::<_, f64>(n_dims + j)?);
            }
            Ok(AggregateRow { dims, measures })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
