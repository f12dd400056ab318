//! Sweeps: load every block through a lab and apply a derivative operator.
//!
//! The serial sweep drives one lab; the parallel sweep (feature `rayon`) gives
//! each worker its own lab and lets the shared collection and boundary locks
//! arbitrate. Outputs go to a second collection, each block locked
//! exclusively only while its derivative is written.

use crate::Real;
use crate::algs::lab::{ScalarBlockLab, Streamer};
use crate::algs::stencil::{BlockSink, FiniteDifference, StreamPolicy};
use crate::data::block::Components;
use crate::data::collection::BlockCollection;
use crate::mesh_error::MeshError;
use crate::topology::axis::Axis;
use crate::topology::block_info::BlockInfo;
use crate::topology::boundary::BoundaryInfo;

/// Where a sweep writes its results.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SweepTarget {
    /// Derivative direction.
    pub axis: Axis,
    /// Output component receiving the derivative.
    pub component: usize,
    pub policy: StreamPolicy,
}

/// Inputs shared by every block of a sweep.
#[derive(Debug)]
pub struct Sweep<'a, E, O> {
    pub input: &'a BlockCollection<E>,
    pub boundary: &'a BoundaryInfo,
    pub op: &'a O,
    pub time: Real,
}

impl<'a, E, O> Sweep<'a, E, O>
where
    O: FiniteDifference,
{
    /// Derivative of the streamed scalar for every block in `infos`, serially.
    pub fn run_into<S, F>(
        &self,
        streamer: S,
        infos: &[BlockInfo],
        output: &BlockCollection<F>,
        target: SweepTarget,
    ) -> Result<(), MeshError>
    where
        S: Streamer<E>,
        F: Components,
    {
        let mut lab = self.ready_lab(streamer)?;
        for info in infos {
            self.apply(&mut lab, info, output, target)?;
        }
        log::debug!("serial sweep over {} blocks done", infos.len());
        Ok(())
    }

    /// Parallel variant of [`run_into`](Self::run_into), one lab per worker.
    #[cfg(feature = "rayon")]
    pub fn par_run_into<S, F>(
        &self,
        streamer: S,
        infos: &[BlockInfo],
        output: &BlockCollection<F>,
        target: SweepTarget,
    ) -> Result<(), MeshError>
    where
        S: Streamer<E> + Clone + Send + Sync,
        E: Send + Sync,
        F: Components + Send + Sync,
        O: Sync,
    {
        use rayon::prelude::*;

        // fail once up front rather than in every worker
        self.op.footprint().check_within(self.boundary.footprint())?;
        infos.par_iter().try_for_each_init(
            || self.ready_lab(streamer.clone()),
            |lab, info| match lab {
                Ok(lab) => self.apply(lab, info, output, target),
                Err(e) => Err(e.clone()),
            },
        )?;
        log::debug!("parallel sweep over {} blocks done", infos.len());
        Ok(())
    }

    fn ready_lab<S>(&self, streamer: S) -> Result<ScalarBlockLab<'a, E, S>, MeshError>
    where
        S: Streamer<E>,
    {
        let mut lab = ScalarBlockLab::new(streamer);
        lab.prepare(self.input, self.boundary, self.op.footprint())?;
        lab.begin_step(self.time)?;
        Ok(lab)
    }

    fn apply<S, F>(
        &self,
        lab: &mut ScalarBlockLab<'a, E, S>,
        info: &BlockInfo,
        output: &BlockCollection<F>,
        target: SweepTarget,
    ) -> Result<(), MeshError>
    where
        S: Streamer<E>,
        F: Components,
    {
        lab.load(info)?;
        let mut out = output.lock_mut(info.block_id)?;
        let mut sink = BlockSink::new(&mut *out, target.component, target.policy);
        self.op
            .derivative(&*lab, info, self.input.shape(), target.axis, &mut sink);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::lab::Scalar;
    use crate::algs::stencil::Order2;
    use crate::data::block::BlockShape;
    use crate::topology::uniform::UniformGrid;

    #[test]
    fn gradient_of_linear_field() {
        let grid = UniformGrid::new(1, BlockShape::new(4, 4));
        let input = grid.collection_from_fn(|x, y| 3.0 * x + y).unwrap();
        let boundary = grid.boundary(Order2.footprint()).unwrap();
        let output = grid.collection_from_fn(|_, _| [0.0; 2]).unwrap();
        let sweep = Sweep {
            input: &input,
            boundary: &boundary,
            op: &Order2,
            time: 0.0,
        };
        let infos = grid.infos();
        for axis in Axis::ALL {
            let target = SweepTarget {
                axis,
                component: axis.index(),
                policy: StreamPolicy::Assign,
            };
            sweep.run_into(Scalar::default(), &infos, &output, target).unwrap();
        }
        for id in output.ids() {
            let block = output.lock(id).unwrap();
            for g in block.as_slice() {
                assert!((g[0] - 3.0).abs() < 1e-9 && (g[1] - 1.0).abs() < 1e-9, "{g:?}");
            }
        }
    }
}
